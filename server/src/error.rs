use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use kernel::KernelError;
use serde_json::json;
use std::process::{ExitCode, Termination};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl ErrorStatus {
    fn status(&self) -> StatusCode {
        match self.0.current_context() {
            KernelError::NotFound { .. } => StatusCode::NOT_FOUND,
            KernelError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            KernelError::InsufficientStock { .. } | KernelError::Concurrency => {
                StatusCode::CONFLICT
            }
            KernelError::Cancelled | KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
            KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        let message = match self.0.current_context() {
            KernelError::Internal => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::ErrorStatus;
    use axum::http::StatusCode;
    use error_stack::Report;
    use kernel::KernelError;
    use uuid::Uuid;

    fn status_of(error: KernelError) -> StatusCode {
        ErrorStatus::from(Report::new(error)).status()
    }

    #[test]
    fn kernel_errors_map_to_http_statuses() {
        assert_eq!(
            status_of(KernelError::not_found("order", Uuid::nil())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(KernelError::validation("empty")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(KernelError::InsufficientStock {
                book_id: Uuid::nil(),
                requested: 2,
                available: 0,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(KernelError::Concurrency), StatusCode::CONFLICT);
        assert_eq!(status_of(KernelError::Timeout), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(status_of(KernelError::Cancelled), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            status_of(KernelError::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
