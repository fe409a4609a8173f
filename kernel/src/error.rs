use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    NotFound {
        entity: &'static str,
        id: String,
    },
    InsufficientStock {
        book_id: uuid::Uuid,
        requested: i32,
        available: i32,
    },
    Validation(String),
    Cancelled,
    Concurrency,
    Timeout,
    Internal,
}

impl KernelError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        KernelError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        KernelError::Validation(reason.into())
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            KernelError::InsufficientStock {
                book_id,
                requested,
                available,
            } => write!(
                f,
                "Insufficient stock for book {book_id}: requested {requested}, available {available}"
            ),
            KernelError::Validation(reason) => write!(f, "Validation failed: {reason}"),
            KernelError::Cancelled => write!(f, "Operation cancelled"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
