use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::{BookId, BookTitle};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct BookSales {
    book_id: BookId,
    title: BookTitle,
    quantity: i64,
}

impl BookSales {
    pub fn new(book_id: BookId, title: BookTitle, quantity: i64) -> Self {
        Self {
            book_id,
            title,
            quantity,
        }
    }
}
