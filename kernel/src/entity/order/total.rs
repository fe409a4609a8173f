use error_stack::Report;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::OrderItem;
use crate::KernelError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct OrderTotal(Decimal);

impl OrderTotal {
    pub const MAX: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

    pub fn new(total: impl Into<Decimal>) -> Self {
        Self(total.into())
    }

    pub fn of(items: &[OrderItem]) -> error_stack::Result<Self, KernelError> {
        items
            .iter()
            .try_fold(Self::default(), |total, item| total.accumulate(item))
    }

    pub fn accumulate(self, item: &OrderItem) -> error_stack::Result<Self, KernelError> {
        item.subtotal()
            .and_then(|subtotal| self.0.checked_add(subtotal))
            .filter(|total| *total <= Self::MAX)
            .map(Self)
            .ok_or_else(|| {
                Report::new(KernelError::validation(format!(
                    "order total would exceed {}",
                    Self::MAX
                )))
            })
    }
}
