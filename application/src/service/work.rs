use std::ops::{Deref, DerefMut};

use kernel::interface::config::StockAtomicity;
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

/// Hands out the transaction each step of an order operation runs in.
///
/// With [`StockAtomicity::AllOrNothing`] every step shares one transaction that
/// only becomes durable through [`UnitOfWork::commit`]; dropping the unit
/// without committing rolls all steps back. With [`StockAtomicity::PerStep`]
/// each step gets a fresh transaction that commits on [`Step::finish`].
pub(crate) struct UnitOfWork<'a, C: DatabaseConnection> {
    connection: &'a C,
    shared: Option<C::Transaction>,
}

impl<'a, C: DatabaseConnection> UnitOfWork<'a, C> {
    pub(crate) async fn begin(
        connection: &'a C,
        atomicity: &StockAtomicity,
    ) -> error_stack::Result<Self, KernelError> {
        let shared = match atomicity {
            StockAtomicity::AllOrNothing => Some(connection.transact().await?),
            StockAtomicity::PerStep => None,
        };
        Ok(Self { connection, shared })
    }

    pub(crate) async fn step(&mut self) -> error_stack::Result<Step<'_, C::Transaction>, KernelError> {
        match self.shared {
            Some(ref mut shared) => Ok(Step::Shared(shared)),
            None => Ok(Step::Owned(self.connection.transact().await?)),
        }
    }

    pub(crate) async fn commit(self) -> error_stack::Result<(), KernelError> {
        match self.shared {
            Some(shared) => shared.commit().await,
            None => Ok(()),
        }
    }
}

pub(crate) enum Step<'a, T: Transaction> {
    Owned(T),
    Shared(&'a mut T),
}

impl<T: Transaction> Step<'_, T> {
    pub(crate) async fn finish(self) -> error_stack::Result<(), KernelError> {
        match self {
            Step::Owned(con) => con.commit().await,
            Step::Shared(_) => Ok(()),
        }
    }
}

impl<T: Transaction> Deref for Step<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        match self {
            Step::Owned(con) => con,
            Step::Shared(con) => con,
        }
    }
}

impl<T: Transaction> DerefMut for Step<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Step::Owned(con) => con,
            Step::Shared(con) => con,
        }
    }
}
