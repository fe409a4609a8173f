use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::OrderTotal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct Revenue(Decimal);

impl Revenue {
    pub fn new(revenue: impl Into<Decimal>) -> Self {
        Self(revenue.into())
    }

    pub fn add(self, total: &OrderTotal) -> Self {
        Self(self.0 + *total.as_ref())
    }
}
