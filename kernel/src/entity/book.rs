mod genre;
mod id;
mod price;
mod published_at;
mod search;
mod stock;
mod title;

pub use self::{genre::*, id::*, price::*, published_at::*, search::*, stock::*, title::*};
use destructure::Destructure;
use error_stack::Report;
use vodca::References;

use crate::entity::{AuthorId, OrderQuantity, Version};
use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author_id: AuthorId,
    genres: BookGenres,
    published_at: PublishedAt,
    price: BookPrice,
    stock: BookStock,
    version: Version<Book>,
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookId,
        title: BookTitle,
        author_id: AuthorId,
        genres: BookGenres,
        published_at: PublishedAt,
        price: BookPrice,
        stock: BookStock,
        version: Version<Book>,
    ) -> Self {
        Self {
            id,
            title,
            author_id,
            genres,
            published_at,
            price,
            stock,
            version,
        }
    }

    /// The version is left untouched; the store compares it when writing.
    pub fn deduct(self, quantity: &OrderQuantity) -> error_stack::Result<Self, KernelError> {
        let requested = *quantity.as_ref();
        let available = *self.stock.as_ref();
        match self.stock.checked_sub(requested) {
            Some(stock) => Ok(Self { stock, ..self }),
            None => Err(Report::new(KernelError::InsufficientStock {
                book_id: *self.id.as_ref(),
                requested,
                available,
            })),
        }
    }

    pub fn restock(self, quantity: &OrderQuantity) -> error_stack::Result<Self, KernelError> {
        match self.stock.checked_add(*quantity.as_ref()) {
            Some(stock) => Ok(Self { stock, ..self }),
            None => Err(Report::new(KernelError::validation(format!(
                "restocking {} units of book {} would overflow its stock",
                quantity.as_ref(),
                self.id.as_ref()
            )))),
        }
    }
}
