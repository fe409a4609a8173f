mod catalog;
mod order;
mod report;
mod stock;
mod work;

#[cfg(test)]
mod fixture;

pub use self::{catalog::*, order::*, report::*};

use error_stack::Report;
use kernel::KernelError;
use tokio_util::sync::CancellationToken;

pub(crate) fn ensure_active(token: &CancellationToken) -> error_stack::Result<(), KernelError> {
    if token.is_cancelled() {
        return Err(Report::new(KernelError::Cancelled));
    }
    Ok(())
}
