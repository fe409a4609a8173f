use error_stack::Report;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct BookPrice(Decimal);

impl BookPrice {
    pub const MAX: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

    pub fn new(price: impl Into<Decimal>) -> Self {
        Self(price.into())
    }

    pub fn parse(price: Decimal) -> error_stack::Result<Self, KernelError> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(Report::new(KernelError::validation(
                "price must not be negative",
            )));
        }
        if price.normalize().scale() > 2 {
            return Err(Report::new(KernelError::validation(format!(
                "price {price} has more than two decimal places"
            ))));
        }
        if price > Self::MAX {
            return Err(Report::new(KernelError::validation(format!(
                "price {price} exceeds {}",
                Self::MAX
            ))));
        }
        Ok(Self(price.abs().round_dp(2)))
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}
