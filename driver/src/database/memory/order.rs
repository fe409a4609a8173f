use error_stack::Report;
use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{CustomerId, Order, OrderId, TimeWindow};
use kernel::KernelError;

use crate::database::memory::{MemoryState, MemoryTransaction};

pub struct MemoryOrderRepository;

impl MemoryState {
    fn hydrate(&self, order: &Order) -> Order {
        let customer = self.customers.get(order.customer_id()).cloned();
        order
            .clone()
            .hydrate(customer, |author_id| self.authors.get(author_id).cloned())
    }

    fn orders_where<P>(&self, predicate: P) -> Vec<Order>
    where
        P: Fn(&Order) -> bool,
    {
        let mut found = self
            .orders
            .values()
            .filter(|order| predicate(order))
            .map(|order| self.hydrate(order))
            .collect::<Vec<_>>();
        found.sort_by(|a, b| {
            a.created_at()
                .as_ref()
                .cmp(b.created_at().as_ref())
                .then_with(|| a.id().as_ref().cmp(b.id().as_ref()))
        });
        found
    }
}

#[async_trait::async_trait]
impl OrderQuery for MemoryOrderRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        Ok(con.orders.get(id).map(|order| con.hydrate(order)))
    }

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        Ok(con.orders_where(|_| true))
    }

    async fn find_by_customer_id(
        &self,
        con: &mut MemoryTransaction,
        customer_id: &CustomerId,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        Ok(con.orders_where(|order| order.customer_id() == customer_id))
    }

    async fn find_by_created_range(
        &self,
        con: &mut MemoryTransaction,
        window: &TimeWindow,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        Ok(con.orders_where(|order| window.contains(order.created_at().as_ref())))
    }
}

impl MemoryState {
    fn check_order_version(&self, order: &Order) -> error_stack::Result<(), KernelError> {
        let stored = self
            .orders
            .get(order.id())
            .ok_or_else(|| Report::new(KernelError::not_found("Order", order.id().as_ref())))?;
        if stored.version() != order.version() {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "order {} is at version {}, write expected {}",
                order.id().as_ref(),
                stored.version().as_ref(),
                order.version().as_ref()
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl OrderModifier for MemoryOrderRepository {
    type Transaction = MemoryTransaction;
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        con.write_order(order.id(), Some(order.clone()));
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        con.check_order_version(order)?;
        con.write_order(order.id(), Some(order.clone().stored()));
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError> {
        con.check_order_version(order)?;
        con.write_order(order.id(), None);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use error_stack::Report;
use kernel::interface::query::OrderQuery;
    use kernel::interface::update::{AuthorModifier, CustomerModifier, OrderModifier};
    use kernel::prelude::entity::{
        Address, Author, AuthorBio, AuthorFirstName, AuthorId, AuthorLastName, BookGenres,
        BookId, BookPrice, BookSnapshot, BookTitle, CreatedAt, Customer, CustomerEmail,
        CustomerId, CustomerName, Order, OrderId, OrderItem, OrderItemId, OrderQuantity,
        OrderStatus, TimeWindow, Version,
    };
    use kernel::KernelError;
    use rust_decimal::Decimal;
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::database::memory::{
        MemoryAuthorRepository, MemoryCustomerRepository, MemoryDatabase, MemoryOrderRepository,
    };

    #[tokio::test]
    async fn reads_are_hydrated_and_filtered() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::default();
        let mut con = db.transact().await?;

        let author = Author::new(
            AuthorId::new(Uuid::new_v4()),
            AuthorFirstName::new("Stanisław"),
            AuthorLastName::new("Lem"),
            AuthorBio::default(),
        );
        MemoryAuthorRepository.create(&mut con, &author).await?;
        let customer = Customer::new(
            CustomerId::new(Uuid::new_v4()),
            CustomerName::new("Ada"),
            CustomerEmail::new("ada@example.com"),
            Address::default(),
            CreatedAt::now(),
        );
        MemoryCustomerRepository.create(&mut con, &customer).await?;

        let order = Order::new(
            OrderId::new(Uuid::new_v4()),
            customer.id().clone(),
            None,
            vec![OrderItem::new(
                OrderItemId::new(Uuid::new_v4()),
                BookId::new(Uuid::new_v4()),
                OrderQuantity::new(1),
                BookSnapshot::new(
                    BookTitle::new("Solaris"),
                    author.id().clone(),
                    None,
                    BookGenres::default(),
                    BookPrice::new(Decimal::new(900, 2)),
                ),
            )],
            OrderStatus::created(),
            CreatedAt::new(datetime!(2025-03-01 10:00 UTC)),
            Version::initial(),
        )?;
        MemoryOrderRepository.create(&mut con, &order).await?;

        let found = MemoryOrderRepository
            .find_by_id(&mut con, order.id())
            .await?
            .unwrap();
        assert_eq!(found.customer(), &Some(customer.clone()));
        assert_eq!(found.items()[0].snapshot().author(), &Some(author));

        let by_customer = MemoryOrderRepository
            .find_by_customer_id(&mut con, customer.id())
            .await?;
        assert_eq!(by_customer.len(), 1);

        let inside = TimeWindow::day_before(datetime!(2025-03-02 00:00 UTC));
        let outside = TimeWindow::day_before(datetime!(2025-03-03 00:00 UTC));
        assert_eq!(
            MemoryOrderRepository
                .find_by_created_range(&mut con, &inside)
                .await?
                .len(),
            1
        );
        assert!(MemoryOrderRepository
            .find_by_created_range(&mut con, &outside)
            .await?
            .is_empty());

        MemoryOrderRepository.update(&mut con, &order).await?;
        let stale = MemoryOrderRepository
            .delete(&mut con, &order)
            .await
            .unwrap_err();
        assert_eq!(stale.current_context(), &KernelError::Concurrency);

        MemoryOrderRepository
            .delete(&mut con, &order.clone().stored())
            .await?;
        assert!(MemoryOrderRepository
            .find_by_id(&mut con, order.id())
            .await?
            .is_none());

        let gone = MemoryOrderRepository
            .delete(&mut con, &order.stored())
            .await
            .unwrap_err();
        assert!(matches!(
            gone.current_context(),
            KernelError::NotFound { entity: "Order", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn update_compares_and_bumps_the_version() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::default();
        let mut con = db.transact().await?;
        let order = Order::new(
            OrderId::new(Uuid::new_v4()),
            CustomerId::new(Uuid::new_v4()),
            None,
            Vec::new(),
            OrderStatus::created(),
            CreatedAt::now(),
            Version::initial(),
        )?;
        MemoryOrderRepository.create(&mut con, &order).await?;

        MemoryOrderRepository.update(&mut con, &order).await?;
        let stored = MemoryOrderRepository
            .find_by_id(&mut con, order.id())
            .await?
            .unwrap();
        assert_eq!(stored.version(), &Version::new(1));

        let error = MemoryOrderRepository
            .update(&mut con, &order)
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Concurrency);
        Ok(())
    }
}
