use std::collections::HashMap;

use kernel::interface::query::ReportQuery;
use kernel::interface::update::ReportModifier;
use kernel::prelude::entity::{
    BookId, BookSales, BookTitle, CreatedAt, Revenue, SalesReport, SalesReportId, TimeWindow,
};
use kernel::KernelError;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresReportRepository;

#[async_trait::async_trait]
impl ReportQuery for PostgresReportRepository {
    type Transaction = PostgresTransaction;
    async fn find_by_generated_range(
        &self,
        con: &mut PostgresTransaction,
        window: &TimeWindow,
    ) -> error_stack::Result<Vec<SalesReport>, KernelError> {
        PgReportInternal::find_by_generated_range(con, window).await
    }
}

#[async_trait::async_trait]
impl ReportModifier for PostgresReportRepository {
    type Transaction = PostgresTransaction;
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        report: &SalesReport,
    ) -> error_stack::Result<(), KernelError> {
        PgReportInternal::create(con, report).await
    }
}

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: Uuid,
    generated_at: OffsetDateTime,
    window_from: OffsetDateTime,
    window_to: OffsetDateTime,
    total_revenue: Decimal,
    total_orders: i64,
}

#[derive(sqlx::FromRow)]
struct BookSalesRow {
    report_id: Uuid,
    book_id: Uuid,
    title: String,
    quantity: i64,
}

impl From<BookSalesRow> for BookSales {
    fn from(value: BookSalesRow) -> Self {
        BookSales::new(
            BookId::new(value.book_id),
            BookTitle::new(value.title),
            value.quantity,
        )
    }
}

pub(in crate::database) struct PgReportInternal;

impl PgReportInternal {
    async fn find_by_generated_range(
        con: &mut PgConnection,
        window: &TimeWindow,
    ) -> error_stack::Result<Vec<SalesReport>, KernelError> {
        let rows = sqlx::query_as::<_, ReportRow>(
            // language=postgresql
            r#"
            SELECT id, generated_at, window_from, window_to, total_revenue, total_orders
            FROM sales_reports
            WHERE generated_at BETWEEN $1 AND $2
            ORDER BY generated_at
            "#,
        )
        .bind(window.from())
        .bind(window.to())
        .fetch_all(&mut *con)
        .await
        .convert_error()?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids = rows.iter().map(|row| row.id).collect::<Vec<_>>();
        let book_rows = sqlx::query_as::<_, BookSalesRow>(
            // language=postgresql
            r#"
            SELECT report_id, book_id, title, quantity
            FROM sales_report_books
            WHERE report_id = ANY($1)
            ORDER BY report_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(con)
        .await
        .convert_error()?;
        let mut books: HashMap<Uuid, Vec<BookSales>> = HashMap::new();
        for row in book_rows {
            books.entry(row.report_id).or_default().push(row.into());
        }

        rows.into_iter()
            .map(|row| -> error_stack::Result<SalesReport, KernelError> {
                let window = TimeWindow::new(row.window_from, row.window_to)?;
                Ok(SalesReport::new(
                    SalesReportId::new(row.id),
                    CreatedAt::new(row.generated_at),
                    window,
                    Revenue::new(row.total_revenue),
                    row.total_orders,
                    books.remove(&row.id).unwrap_or_default(),
                ))
            })
            .collect()
    }

    async fn create(
        con: &mut PgConnection,
        report: &SalesReport,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO sales_reports (id, generated_at, window_from, window_to, total_revenue, total_orders)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(report.id().as_ref())
        .bind(report.generated_at().as_ref())
        .bind(report.window().from())
        .bind(report.window().to())
        .bind(report.total_revenue().as_ref())
        .bind(report.total_orders())
        .execute(&mut *con)
        .await
        .convert_error()?;

        for (position, book) in report.books().iter().enumerate() {
            // language=postgresql
            sqlx::query(
                r#"
                INSERT INTO sales_report_books (report_id, position, book_id, title, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(report.id().as_ref())
            .bind(position as i32)
            .bind(book.book_id().as_ref())
            .bind(book.title().as_ref())
            .bind(book.quantity())
            .execute(&mut *con)
            .await
            .convert_error()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::config::FulfillmentPolicy;
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::ReportQuery;
    use kernel::interface::update::ReportModifier;
    use kernel::prelude::entity::{
        BookId, BookSales, BookTitle, CreatedAt, Revenue, SalesReport, SalesReportId, TimeWindow,
    };
    use kernel::KernelError;
    use rust_decimal::Decimal;
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::database::postgres::{PostgresDatabase, PostgresReportRepository};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new(FulfillmentPolicy::default()).await?;
        let mut con = db.transact().await?;
        let report = SalesReport::new(
            SalesReportId::new(Uuid::new_v4()),
            CreatedAt::new(datetime!(2025-03-02 00:00:01 UTC)),
            TimeWindow::day_before(datetime!(2025-03-02 00:00 UTC)),
            Revenue::new(Decimal::new(3500, 2)),
            2,
            vec![
                BookSales::new(BookId::new(Uuid::new_v4()), BookTitle::new("A"), 3),
                BookSales::new(BookId::new(Uuid::new_v4()), BookTitle::new("B"), 1),
            ],
        );
        PostgresReportRepository.create(&mut con, &report).await?;

        let window = TimeWindow::new(
            datetime!(2025-03-02 00:00 UTC),
            datetime!(2025-03-02 23:59 UTC),
        )?;
        let found = PostgresReportRepository
            .find_by_generated_range(&mut con, &window)
            .await?;
        let found = found.iter().find(|r| r.id() == report.id()).unwrap();
        assert_eq!(found, &report);
        Ok(())
    }
}
