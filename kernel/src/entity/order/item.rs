use destructure::Destructure;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::{
    Author, AuthorId, Book, BookGenres, BookId, BookPrice, BookTitle, OrderItemId, OrderQuantity,
};

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct OrderItem {
    id: OrderItemId,
    book_id: BookId,
    quantity: OrderQuantity,
    snapshot: BookSnapshot,
}

impl OrderItem {
    pub fn new(
        id: OrderItemId,
        book_id: BookId,
        quantity: OrderQuantity,
        snapshot: BookSnapshot,
    ) -> Self {
        Self {
            id,
            book_id,
            quantity,
            snapshot,
        }
    }

    pub fn with_author(self, author: Option<Author>) -> Self {
        Self {
            snapshot: self.snapshot.with_author(author),
            ..self
        }
    }

    pub fn subtotal(&self) -> Option<Decimal> {
        self.snapshot
            .price()
            .as_ref()
            .checked_mul(Decimal::from(*self.quantity.as_ref()))
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct BookSnapshot {
    title: BookTitle,
    author_id: AuthorId,
    author: Option<Author>,
    genres: BookGenres,
    price: BookPrice,
}

impl BookSnapshot {
    pub fn new(
        title: BookTitle,
        author_id: AuthorId,
        author: Option<Author>,
        genres: BookGenres,
        price: BookPrice,
    ) -> Self {
        Self {
            title,
            author_id,
            author,
            genres,
            price,
        }
    }

    pub fn with_author(self, author: Option<Author>) -> Self {
        Self { author, ..self }
    }
}

impl From<&Book> for BookSnapshot {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title().clone(),
            author_id: book.author_id().clone(),
            author: None,
            genres: book.genres().clone(),
            price: *book.price(),
        }
    }
}
