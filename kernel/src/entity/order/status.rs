use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

pub static ORDER_STATUS_CREATED: &str = "Created";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct OrderStatus(String);

impl OrderStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn created() -> Self {
        Self::new(ORDER_STATUS_CREATED)
    }
}
