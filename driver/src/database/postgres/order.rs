use std::collections::HashMap;

use error_stack::Report;
use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{
    AuthorId, BookGenres, BookId, BookPrice, BookSnapshot, BookTitle, CreatedAt, CustomerId,
    Order, OrderId, OrderItem, OrderItemId, OrderQuantity, OrderStatus, TimeWindow, Version,
};
use kernel::KernelError;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::database::postgres::author::PgAuthorInternal;
use crate::database::postgres::customer::PgCustomerInternal;
use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for PostgresOrderRepository {
    type Transaction = PostgresTransaction;
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        PgOrderInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        PgOrderInternal::find_all(con).await
    }

    async fn find_by_customer_id(
        &self,
        con: &mut PostgresTransaction,
        customer_id: &CustomerId,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        PgOrderInternal::find_by_customer_id(con, customer_id).await
    }

    async fn find_by_created_range(
        &self,
        con: &mut PostgresTransaction,
        window: &TimeWindow,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        PgOrderInternal::find_by_created_range(con, window).await
    }
}

#[async_trait::async_trait]
impl OrderModifier for PostgresOrderRepository {
    type Transaction = PostgresTransaction;
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::create(con, order).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::update(con, order).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::delete(con, order).await
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Uuid,
    status: String,
    created_at: OffsetDateTime,
    version: i64,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    book_id: Uuid,
    quantity: i32,
    title: String,
    author_id: Uuid,
    genres: Vec<String>,
    unit_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(value: OrderItemRow) -> Self {
        OrderItem::new(
            OrderItemId::new(value.id),
            BookId::new(value.book_id),
            OrderQuantity::new(value.quantity),
            BookSnapshot::new(
                BookTitle::new(value.title),
                AuthorId::new(value.author_id),
                None,
                BookGenres::new(value.genres),
                BookPrice::new(value.unit_price),
            ),
        )
    }
}

pub(in crate::database) struct PgOrderInternal;

impl PgOrderInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        let row = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, customer_id, status, created_at, version
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(&mut *con)
        .await
        .convert_error()?;
        match row {
            Some(row) => Ok(Self::assemble(con, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Order>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, customer_id, status, created_at, version
            FROM orders
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&mut *con)
        .await
        .convert_error()?;
        Self::assemble(con, rows).await
    }

    async fn find_by_customer_id(
        con: &mut PgConnection,
        customer_id: &CustomerId,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, customer_id, status, created_at, version
            FROM orders
            WHERE customer_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(customer_id.as_ref())
        .fetch_all(&mut *con)
        .await
        .convert_error()?;
        Self::assemble(con, rows).await
    }

    async fn find_by_created_range(
        con: &mut PgConnection,
        window: &TimeWindow,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, customer_id, status, created_at, version
            FROM orders
            WHERE created_at BETWEEN $1 AND $2
            ORDER BY created_at, id
            "#,
        )
        .bind(window.from())
        .bind(window.to())
        .fetch_all(&mut *con)
        .await
        .convert_error()?;
        Self::assemble(con, rows).await
    }

    async fn assemble(
        con: &mut PgConnection,
        rows: Vec<OrderRow>,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let order_ids = rows.iter().map(|row| row.id).collect::<Vec<_>>();
        let customer_ids = rows.iter().map(|row| row.customer_id).collect::<Vec<_>>();

        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            // language=postgresql
            r#"
            SELECT id, order_id, book_id, quantity, title, author_id, genres, unit_price
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            "#,
        )
        .bind(&order_ids)
        .fetch_all(&mut *con)
        .await
        .convert_error()?;

        let author_ids = item_rows
            .iter()
            .map(|row| row.author_id)
            .collect::<Vec<_>>();
        let authors = PgAuthorInternal::find_by_ids(&mut *con, &author_ids)
            .await?
            .into_iter()
            .map(|author| (author.id().clone(), author))
            .collect::<HashMap<_, _>>();
        let customers = PgCustomerInternal::find_by_ids(&mut *con, &customer_ids)
            .await?
            .into_iter()
            .map(|customer| (customer.id().clone(), customer))
            .collect::<HashMap<_, _>>();

        let mut items: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            items.entry(row.order_id).or_default().push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let customer_id = CustomerId::new(row.customer_id);
                let customer = customers.get(&customer_id).cloned();
                let order = Order::new(
                    OrderId::new(row.id),
                    customer_id,
                    None,
                    items.remove(&row.id).unwrap_or_default(),
                    OrderStatus::new(row.status),
                    CreatedAt::new(row.created_at),
                    Version::new(row.version),
                )?;
                Ok(order.hydrate(customer, |author_id| authors.get(author_id).cloned()))
            })
            .collect()
    }

    async fn create(con: &mut PgConnection, order: &Order) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, total, status, created_at, version)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.customer_id().as_ref())
        .bind(order.total().as_ref())
        .bind(order.status().as_ref())
        .bind(order.created_at().as_ref())
        .bind(order.version().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        Self::insert_items(con, order).await
    }

    async fn update(con: &mut PgConnection, order: &Order) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET total = $3, status = $4, version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.version().as_ref())
        .bind(order.total().as_ref())
        .bind(order.status().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Self::missed(con, order).await);
        }

        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM order_items
            WHERE order_id = $1
            "#,
        )
        .bind(order.id().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        Self::insert_items(con, order).await
    }

    async fn insert_items(
        con: &mut PgConnection,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        for (position, item) in order.items().iter().enumerate() {
            let snapshot = item.snapshot();
            // language=postgresql
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, position, book_id, quantity, title, author_id, genres, unit_price)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(item.id().as_ref())
            .bind(order.id().as_ref())
            .bind(position as i32)
            .bind(item.book_id().as_ref())
            .bind(item.quantity().as_ref())
            .bind(snapshot.title().as_ref())
            .bind(snapshot.author_id().as_ref())
            .bind(snapshot.genres().as_ref())
            .bind(snapshot.price().as_ref())
            .execute(&mut *con)
            .await
            .convert_error()?;
        }
        Ok(())
    }

    async fn delete(con: &mut PgConnection, order: &Order) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            DELETE FROM orders
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.version().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Self::missed(con, order).await);
        }
        Ok(())
    }

    async fn missed(con: &mut PgConnection, order: &Order) -> Report<KernelError> {
        // language=postgresql
        let exists = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT version
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(order.id().as_ref())
        .fetch_optional(con)
        .await
        .convert_error();
        match exists {
            Ok(Some(stored)) => Report::new(KernelError::Concurrency).attach_printable(format!(
                "order {} is at version {stored}, write expected {}",
                order.id().as_ref(),
                order.version().as_ref()
            )),
            Ok(None) => Report::new(KernelError::not_found("Order", order.id().as_ref())),
            Err(report) => report,
        }
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::config::FulfillmentPolicy;
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::OrderQuery;
    use kernel::interface::update::{AuthorModifier, CustomerModifier, OrderModifier};
    use kernel::prelude::entity::{
        Address, Author, AuthorBio, AuthorFirstName, AuthorId, AuthorLastName, BookGenres,
        BookId, BookPrice, BookSnapshot, BookTitle, CreatedAt, Customer, CustomerEmail,
        CustomerId, CustomerName, Order, OrderId, OrderItem, OrderItemId, OrderQuantity,
        OrderStatus, OrderTotal, TimeWindow, Version,
    };
    use kernel::KernelError;
    use rust_decimal::Decimal;
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::database::postgres::{
        PostgresAuthorRepository, PostgresCustomerRepository, PostgresDatabase,
        PostgresOrderRepository,
    };

    fn item(author_id: &AuthorId, quantity: i32, cents: i64) -> OrderItem {
        OrderItem::new(
            OrderItemId::new(Uuid::new_v4()),
            BookId::new(Uuid::new_v4()),
            OrderQuantity::new(quantity),
            BookSnapshot::new(
                BookTitle::new("Kindred"),
                author_id.clone(),
                None,
                BookGenres::new(vec!["fiction".to_string()]),
                BookPrice::new(Decimal::new(cents, 2)),
            ),
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new(FulfillmentPolicy::default()).await?;
        let mut con = db.transact().await?;

        let author = Author::new(
            AuthorId::new(Uuid::new_v4()),
            AuthorFirstName::new("Octavia"),
            AuthorLastName::new("Butler"),
            AuthorBio::default(),
        );
        PostgresAuthorRepository.create(&mut con, &author).await?;
        let customer = Customer::new(
            CustomerId::new(Uuid::new_v4()),
            CustomerName::new("Ada"),
            CustomerEmail::new("ada@example.com"),
            Address::default(),
            CreatedAt::new(datetime!(2025-01-01 00:00 UTC)),
        );
        PostgresCustomerRepository.create(&mut con, &customer).await?;

        let order = Order::new(
            OrderId::new(Uuid::new_v4()),
            customer.id().clone(),
            None,
            vec![item(author.id(), 2, 1000), item(author.id(), 1, 1500)],
            OrderStatus::created(),
            CreatedAt::new(datetime!(2025-03-01 10:00 UTC)),
            Version::initial(),
        )?;
        PostgresOrderRepository.create(&mut con, &order).await?;

        let found = PostgresOrderRepository
            .find_by_id(&mut con, order.id())
            .await?
            .unwrap();
        assert_eq!(found.items().len(), 2);
        assert_eq!(found.items()[0].id(), order.items()[0].id());
        assert_eq!(found.total(), &OrderTotal::new(Decimal::new(3500, 2)));
        assert_eq!(found.customer(), &Some(customer.clone()));
        assert_eq!(found.items()[0].snapshot().author(), &Some(author.clone()));

        let replaced = order
            .clone()
            .replace_items(vec![item(author.id(), 4, 1000)])?;
        PostgresOrderRepository.update(&mut con, &replaced).await?;
        let found = PostgresOrderRepository
            .find_by_id(&mut con, order.id())
            .await?
            .unwrap();
        assert_eq!(found.items().len(), 1);
        assert_eq!(found.total(), &OrderTotal::new(Decimal::new(4000, 2)));
        assert_eq!(found.version(), &Version::new(1));

        let stale = PostgresOrderRepository
            .update(&mut con, &replaced)
            .await
            .unwrap_err();
        assert_eq!(stale.current_context(), &KernelError::Concurrency);
        let stale = PostgresOrderRepository
            .delete(&mut con, &order)
            .await
            .unwrap_err();
        assert_eq!(stale.current_context(), &KernelError::Concurrency);

        let by_customer = PostgresOrderRepository
            .find_by_customer_id(&mut con, customer.id())
            .await?;
        assert_eq!(by_customer.len(), 1);

        let window = TimeWindow::day_before(datetime!(2025-03-02 00:00 UTC));
        let in_range = PostgresOrderRepository
            .find_by_created_range(&mut con, &window)
            .await?;
        assert!(in_range.iter().any(|o| o.id() == order.id()));

        PostgresOrderRepository.delete(&mut con, &found).await?;
        assert!(PostgresOrderRepository
            .find_by_id(&mut con, order.id())
            .await?
            .is_none());
        let gone = PostgresOrderRepository
            .delete(&mut con, &found)
            .await
            .unwrap_err();
        assert!(matches!(
            gone.current_context(),
            KernelError::NotFound { entity: "Order", .. }
        ));
        Ok(())
    }
}
