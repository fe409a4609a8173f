use error_stack::Report;
use kernel::interface::query::CustomerQuery;
use kernel::interface::update::CustomerModifier;
use kernel::prelude::entity::{Customer, CustomerId};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;

pub struct MemoryCustomerRepository;

#[async_trait::async_trait]
impl CustomerQuery for MemoryCustomerRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &CustomerId,
    ) -> error_stack::Result<Option<Customer>, KernelError> {
        Ok(con.customers.get(id).cloned())
    }

    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
    ) -> error_stack::Result<Vec<Customer>, KernelError> {
        let mut found = con.customers.values().cloned().collect::<Vec<_>>();
        found.sort_by(|a, b| {
            a.created_at()
                .as_ref()
                .cmp(b.created_at().as_ref())
                .then_with(|| a.id().as_ref().cmp(b.id().as_ref()))
        });
        Ok(found)
    }
}

#[async_trait::async_trait]
impl CustomerModifier for MemoryCustomerRepository {
    type Transaction = MemoryTransaction;
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        customer: &Customer,
    ) -> error_stack::Result<(), KernelError> {
        con.write_customer(customer.id(), Some(customer.clone()));
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        customer: &Customer,
    ) -> error_stack::Result<(), KernelError> {
        if !con.customers.contains_key(customer.id()) {
            return Err(Report::new(KernelError::not_found(
                "Customer",
                customer.id().as_ref(),
            )));
        }
        con.write_customer(customer.id(), Some(customer.clone()));
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        id: &CustomerId,
    ) -> error_stack::Result<(), KernelError> {
        if !con.write_customer(id, None) {
            return Err(Report::new(KernelError::not_found("Customer", id.as_ref())));
        }
        Ok(())
    }
}
