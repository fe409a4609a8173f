use std::future::Future;
use std::time::Duration;

use error_stack::Report;
use kernel::KernelError;
use tokio_util::sync::CancellationToken;

use crate::error::ErrorStatus;

mod catalog;
mod order;
mod report;

pub use self::catalog::CatalogRouter;
pub use self::order::OrderRouter;
pub use self::report::ReportRouter;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// The token is cancelled once the request ends or times out.
pub(crate) async fn with_deadline<F, Fut, T>(f: F) -> Result<T, ErrorStatus>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, ErrorStatus>>,
{
    let token = CancellationToken::new();
    let _guard = token.clone().drop_guard();
    match tokio::time::timeout(REQUEST_TIMEOUT, f(token.clone())).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout = ?REQUEST_TIMEOUT, "Request deadline exceeded");
            Err(Report::new(KernelError::Timeout)
                .attach_printable("Request deadline exceeded")
                .into())
        }
    }
}
