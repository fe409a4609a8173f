use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::Order;
use crate::KernelError;

#[async_trait::async_trait]
pub trait OrderModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError>;
    /// Replaces the stored item set with `order.items()` and stores the next
    /// version, provided the stored version still equals `order.version()`.
    /// A mismatch fails with [`KernelError::Concurrency`], a missing row with
    /// [`KernelError::NotFound`].
    async fn update(
        &self,
        con: &mut Self::Transaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError>;
    /// Version-checked like [`OrderModifier::update`].
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        order: &Order,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnOrderModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type OrderModifier: OrderModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn order_modifier(&self) -> &Self::OrderModifier;
}
