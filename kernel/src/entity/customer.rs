mod address;
mod email;
mod id;
mod name;

pub use self::{address::*, email::*, id::*, name::*};
use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::CreatedAt;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct Customer {
    id: CustomerId,
    name: CustomerName,
    email: CustomerEmail,
    address: Address,
    created_at: CreatedAt<Customer>,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: CustomerName,
        email: CustomerEmail,
        address: Address,
        created_at: CreatedAt<Customer>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            address,
            created_at,
        }
    }
}
