use kernel::prelude::entity::{BookSales, DestructBookSales, DestructSalesReport, SalesReport};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesReportDto {
    pub id: Uuid,
    pub generated_at: OffsetDateTime,
    pub from: OffsetDateTime,
    pub to: OffsetDateTime,
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub books: Vec<BookSalesDto>,
}

impl From<SalesReport> for SalesReportDto {
    fn from(value: SalesReport) -> Self {
        let DestructSalesReport {
            id,
            generated_at,
            window,
            total_revenue,
            total_orders,
            books,
        } = value.into_destruct();
        Self {
            id: id.into(),
            generated_at: generated_at.into(),
            from: *window.from(),
            to: *window.to(),
            total_revenue: total_revenue.into(),
            total_orders,
            books: books.into_iter().map(BookSalesDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSalesDto {
    pub book_id: Uuid,
    pub title: String,
    pub quantity: i64,
}

impl From<BookSales> for BookSalesDto {
    fn from(value: BookSales) -> Self {
        let DestructBookSales {
            book_id,
            title,
            quantity,
        } = value.into_destruct();
        Self {
            book_id: book_id.into(),
            title: title.into(),
            quantity,
        }
    }
}

pub struct GenerateSalesReportDto {
    pub from: OffsetDateTime,
    pub to: OffsetDateTime,
}

pub struct ListSalesReportsDto {
    pub from: OffsetDateTime,
    pub to: OffsetDateTime,
}
