use error_stack::Report;
use kernel::interface::config::{DeletePolicy, DependOnFulfillmentPolicy};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    CustomerQuery, DependOnBookQuery, DependOnCustomerQuery, DependOnOrderQuery,
    OrderQuery,
};
use kernel::interface::update::{DependOnBookModifier, DependOnOrderModifier, OrderModifier};
use kernel::prelude::entity::{
    BookId, CreatedAt, CustomerId, Order, OrderId, OrderQuantity, OrderStatus, TimeWindow,
    Version,
};
use kernel::KernelError;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::service::ensure_active;
use crate::service::stock::{deduct_lines, restock_items};
use crate::service::work::UnitOfWork;
use crate::transfer::{
    CreateOrderDto, DeleteOrderDto, GetOrderDto, ListOrdersByCustomerDto, ListOrdersInRangeDto,
    OrderDto, OrderLineDto, UpdateOrderDto,
};

fn order_lines(
    items: Vec<OrderLineDto>,
) -> error_stack::Result<Vec<(BookId, OrderQuantity)>, KernelError> {
    if items.is_empty() {
        return Err(Report::new(KernelError::validation(
            "an order needs at least one item",
        )));
    }
    items
        .into_iter()
        .map(|line| {
            let quantity = OrderQuantity::new(line.quantity);
            if !quantity.is_positive() {
                return Err(Report::new(KernelError::validation(format!(
                    "quantity for book {} must be at least 1, got {}",
                    line.book_id, line.quantity
                ))));
            }
            Ok((BookId::new(line.book_id), quantity))
        })
        .collect()
}

fn order_not_found(id: &OrderId) -> Report<KernelError> {
    Report::new(KernelError::not_found("Order", id.as_ref()))
}

#[async_trait::async_trait]
pub trait CreateOrderService:
    'static
    + Sync
    + Send
    + DependOnFulfillmentPolicy
    + DependOnCustomerQuery
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnOrderQuery
    + DependOnOrderModifier
{
    async fn create_order(
        &self,
        token: &CancellationToken,
        dto: CreateOrderDto,
    ) -> error_stack::Result<OrderDto, KernelError> {
        ensure_active(token)?;
        let lines = order_lines(dto.items)?;
        let customer_id = CustomerId::new(dto.customer_id);

        let mut work = UnitOfWork::begin(
            self.database_connection(),
            self.fulfillment_policy().atomicity(),
        )
        .await?;

        let mut step = work.step().await?;
        let customer = self
            .customer_query()
            .find_by_id(&mut step, &customer_id)
            .await?;
        step.finish().await?;
        if customer.is_none() {
            return Err(Report::new(KernelError::not_found(
                "Customer",
                customer_id.as_ref(),
            )));
        }

        let items = deduct_lines(self, token, &mut work, &lines).await?;
        let order = Order::new(
            OrderId::new(Uuid::new_v4()),
            customer_id,
            None,
            items,
            OrderStatus::created(),
            CreatedAt::now(),
            Version::initial(),
        )?;

        let mut step = work.step().await?;
        self.order_modifier().create(&mut step, &order).await?;
        let created = self.order_query().find_by_id(&mut step, order.id()).await?;
        step.finish().await?;
        work.commit().await?;

        let created = created.ok_or_else(|| {
            order_not_found(order.id()).attach_printable("created order could not be read back")
        })?;
        tracing::info!(
            order_id = %created.id().as_ref(),
            total = %created.total().as_ref(),
            "Order created"
        );
        Ok(created.into())
    }
}

impl<T> CreateOrderService for T where
    T: DependOnFulfillmentPolicy
        + DependOnCustomerQuery
        + DependOnBookQuery
        + DependOnBookModifier
        + DependOnOrderQuery
        + DependOnOrderModifier
{
}

#[async_trait::async_trait]
pub trait GetOrderService: 'static + Sync + Send + DependOnOrderQuery {
    async fn get_order(
        &self,
        token: &CancellationToken,
        dto: GetOrderDto,
    ) -> error_stack::Result<OrderDto, KernelError> {
        ensure_active(token)?;
        let mut con = self.database_connection().transact().await?;
        let id = OrderId::new(dto.id);
        let order = self.order_query().find_by_id(&mut con, &id).await?;
        con.commit().await?;
        order
            .map(OrderDto::from)
            .ok_or_else(|| order_not_found(&id))
    }
}

impl<T> GetOrderService for T where T: DependOnOrderQuery {}

#[async_trait::async_trait]
pub trait ListOrdersService: 'static + Sync + Send + DependOnOrderQuery {
    async fn list_orders(
        &self,
        token: &CancellationToken,
    ) -> error_stack::Result<Vec<OrderDto>, KernelError> {
        ensure_active(token)?;
        let mut con = self.database_connection().transact().await?;
        let orders = self.order_query().find_all(&mut con).await?;
        con.commit().await?;
        Ok(orders.into_iter().map(OrderDto::from).collect())
    }

    async fn list_orders_in_range(
        &self,
        token: &CancellationToken,
        dto: ListOrdersInRangeDto,
    ) -> error_stack::Result<Vec<OrderDto>, KernelError> {
        ensure_active(token)?;
        let window = TimeWindow::new(dto.from, dto.to)?;
        let mut con = self.database_connection().transact().await?;
        let orders = self
            .order_query()
            .find_by_created_range(&mut con, &window)
            .await?;
        con.commit().await?;
        Ok(orders.into_iter().map(OrderDto::from).collect())
    }
}

impl<T> ListOrdersService for T where T: DependOnOrderQuery {}

#[async_trait::async_trait]
pub trait ListOrdersByCustomerService:
    'static + Sync + Send + DependOnCustomerQuery + DependOnOrderQuery
{
    async fn list_orders_by_customer(
        &self,
        token: &CancellationToken,
        dto: ListOrdersByCustomerDto,
    ) -> error_stack::Result<Vec<OrderDto>, KernelError> {
        ensure_active(token)?;
        let customer_id = CustomerId::new(dto.customer_id);
        let mut con = self.database_connection().transact().await?;
        if self
            .customer_query()
            .find_by_id(&mut con, &customer_id)
            .await?
            .is_none()
        {
            return Err(Report::new(KernelError::not_found(
                "Customer",
                customer_id.as_ref(),
            )));
        }
        let orders = self
            .order_query()
            .find_by_customer_id(&mut con, &customer_id)
            .await?;
        con.commit().await?;
        Ok(orders.into_iter().map(OrderDto::from).collect())
    }
}

impl<T> ListOrdersByCustomerService for T where T: DependOnCustomerQuery + DependOnOrderQuery {}

#[async_trait::async_trait]
pub trait UpdateOrderService:
    'static
    + Sync
    + Send
    + DependOnFulfillmentPolicy
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnOrderQuery
    + DependOnOrderModifier
{
    /// Replaces every line item. The first step restocks the existing items and
    /// empties the order under its version, so a concurrent writer of the same
    /// order fails with `Concurrency` instead of restocking twice. A writer that
    /// loses the final version compare returns what it deducted.
    async fn update_order(
        &self,
        token: &CancellationToken,
        dto: UpdateOrderDto,
    ) -> error_stack::Result<OrderDto, KernelError> {
        ensure_active(token)?;
        let lines = order_lines(dto.items)?;
        let id = OrderId::new(dto.id);

        let mut work = UnitOfWork::begin(
            self.database_connection(),
            self.fulfillment_policy().atomicity(),
        )
        .await?;

        let mut step = work.step().await?;
        let existing = self
            .order_query()
            .find_by_id(&mut step, &id)
            .await?
            .ok_or_else(|| order_not_found(&id))?;
        restock_items(self, token, &mut step, existing.items()).await?;
        let emptied = existing.replace_items(Vec::new())?;
        self.order_modifier().update(&mut step, &emptied).await?;
        step.finish().await?;

        let items = deduct_lines(self, token, &mut work, &lines).await?;
        let replaced = emptied.stored().replace_items(items)?;

        let mut step = work.step().await?;
        if let Err(error) = self.order_modifier().update(&mut step, &replaced).await {
            restock_items(self, token, &mut step, replaced.items()).await?;
            step.finish().await?;
            return Err(error);
        }
        let updated = self.order_query().find_by_id(&mut step, &id).await?;
        step.finish().await?;
        work.commit().await?;

        let updated = updated.ok_or_else(|| order_not_found(&id))?;
        tracing::info!(
            order_id = %updated.id().as_ref(),
            total = %updated.total().as_ref(),
            "Order updated"
        );
        Ok(updated.into())
    }
}

impl<T> UpdateOrderService for T where
    T: DependOnFulfillmentPolicy
        + DependOnBookQuery
        + DependOnBookModifier
        + DependOnOrderQuery
        + DependOnOrderModifier
{
}

#[async_trait::async_trait]
pub trait DeleteOrderService:
    'static
    + Sync
    + Send
    + DependOnFulfillmentPolicy
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnOrderQuery
    + DependOnOrderModifier
{
    async fn delete_order(
        &self,
        token: &CancellationToken,
        dto: DeleteOrderDto,
    ) -> error_stack::Result<(), KernelError> {
        ensure_active(token)?;
        let id = OrderId::new(dto.id);
        let policy = *self.fulfillment_policy();

        let mut work = UnitOfWork::begin(self.database_connection(), policy.atomicity()).await?;

        let mut step = work.step().await?;
        let existing = self
            .order_query()
            .find_by_id(&mut step, &id)
            .await?
            .ok_or_else(|| order_not_found(&id))?;
        if policy.delete() == &DeletePolicy::Restock {
            restock_items(self, token, &mut step, existing.items()).await?;
        }
        self.order_modifier().delete(&mut step, &existing).await?;
        step.finish().await?;
        work.commit().await?;

        tracing::info!(order_id = %id.as_ref(), policy = ?policy.delete(), "Order deleted");
        Ok(())
    }
}

impl<T> DeleteOrderService for T where
    T: DependOnFulfillmentPolicy
        + DependOnBookQuery
        + DependOnBookModifier
        + DependOnOrderQuery
        + DependOnOrderModifier
{
}
