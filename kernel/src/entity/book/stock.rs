use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct BookStock(i32);

impl BookStock {
    pub fn new(stock: impl Into<i32>) -> Self {
        Self(stock.into())
    }

    pub fn checked_sub(&self, quantity: i32) -> Option<Self> {
        self.0
            .checked_sub(quantity)
            .filter(|remaining| *remaining >= 0)
            .map(Self)
    }

    pub fn checked_add(&self, quantity: i32) -> Option<Self> {
        self.0.checked_add(quantity).map(Self)
    }
}
