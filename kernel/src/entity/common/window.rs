use error_stack::Report;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use vodca::References;

use crate::KernelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, References, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "time::serde::rfc3339")]
    from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    to: OffsetDateTime,
}

impl TimeWindow {
    pub fn new(from: OffsetDateTime, to: OffsetDateTime) -> error_stack::Result<Self, KernelError> {
        if from > to {
            return Err(Report::new(KernelError::validation(
                "window start must not be after its end",
            ))
            .attach_printable(format!("from: {from}, to: {to}")));
        }
        Ok(Self { from, to })
    }

    /// The full UTC day that ends at `midnight`, excluding `midnight` itself.
    pub fn day_before(midnight: OffsetDateTime) -> Self {
        Self {
            from: midnight - Duration::days(1),
            to: midnight - Duration::microseconds(1),
        }
    }

    pub fn contains(&self, instant: &OffsetDateTime) -> bool {
        self.from <= *instant && *instant <= self.to
    }
}
