use std::str::FromStr;

use destructure::Mutation;
use error_stack::Report;
use vodca::References;

use crate::KernelError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockAtomicity {
    /// Every stock step commits on its own. A later failure leaves earlier steps applied.
    #[default]
    PerStep,
    AllOrNothing,
}

impl FromStr for StockAtomicity {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-step" | "per_step" => Ok(Self::PerStep),
            "all-or-nothing" | "all_or_nothing" => Ok(Self::AllOrNothing),
            other => Err(Report::new(KernelError::validation(format!(
                "unknown stock atomicity: {other}"
            )))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    #[default]
    Discard,
    Restock,
}

impl FromStr for DeletePolicy {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discard" => Ok(Self::Discard),
            "restock" => Ok(Self::Restock),
            other => Err(Report::new(KernelError::validation(format!(
                "unknown delete policy: {other}"
            )))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, References, Mutation)]
pub struct FulfillmentPolicy {
    atomicity: StockAtomicity,
    delete: DeletePolicy,
}

impl FulfillmentPolicy {
    pub fn new(atomicity: StockAtomicity, delete: DeletePolicy) -> Self {
        Self { atomicity, delete }
    }
}

pub trait DependOnFulfillmentPolicy: 'static + Sync + Send {
    fn fulfillment_policy(&self) -> &FulfillmentPolicy;
}
