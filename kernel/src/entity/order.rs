mod id;
mod item;
mod quantity;
mod status;
mod total;

pub use self::{id::*, item::*, quantity::*, status::*, total::*};
use destructure::Destructure;
use vodca::References;

use crate::entity::{Author, AuthorId, CreatedAt, Customer, CustomerId, Version};
use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    customer: Option<Customer>,
    items: Vec<OrderItem>,
    total: OrderTotal,
    status: OrderStatus,
    created_at: CreatedAt<Order>,
    version: Version<Order>,
}

impl Order {
    /// The total is always derived from `items`; callers never supply it.
    pub fn new(
        id: OrderId,
        customer_id: CustomerId,
        customer: Option<Customer>,
        items: Vec<OrderItem>,
        status: OrderStatus,
        created_at: CreatedAt<Order>,
        version: Version<Order>,
    ) -> error_stack::Result<Self, KernelError> {
        let total = OrderTotal::of(&items)?;
        Ok(Self {
            id,
            customer_id,
            customer,
            items,
            total,
            status,
            created_at,
            version,
        })
    }

    pub fn replace_items(self, items: Vec<OrderItem>) -> error_stack::Result<Self, KernelError> {
        let total = OrderTotal::of(&items)?;
        Ok(Self {
            items,
            total,
            ..self
        })
    }

    pub fn stored(self) -> Self {
        Self {
            version: self.version.next(),
            ..self
        }
    }

    pub fn hydrate<F>(self, customer: Option<Customer>, mut author_of: F) -> Self
    where
        F: FnMut(&AuthorId) -> Option<Author>,
    {
        let items = self
            .items
            .into_iter()
            .map(|item| {
                let author = author_of(item.snapshot().author_id());
                item.with_author(author)
            })
            .collect();
        Self {
            customer,
            items,
            ..self
        }
    }
}
