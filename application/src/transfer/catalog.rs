use kernel::prelude::entity::{
    Address, Author, Book, Customer, DestructAddress, DestructAuthor, DestructBook,
    DestructCustomer,
};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
}

impl From<Author> for AuthorDto {
    fn from(value: Author) -> Self {
        let DestructAuthor {
            id,
            first_name,
            last_name,
            bio,
        } = value.into_destruct();
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            bio: bio.into(),
        }
    }
}

pub struct CreateAuthorDto {
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
}

pub struct GetAuthorDto {
    pub id: Uuid,
}

#[derive(Debug, Default)]
pub struct SearchAuthorsDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Default)]
pub struct UpdateAuthorDto {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

pub struct DeleteAuthorDto {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub genres: Vec<String>,
    pub published_at: OffsetDateTime,
    pub price: Decimal,
    pub stock: i32,
    pub version: i64,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            title,
            author_id,
            genres,
            published_at,
            price,
            stock,
            version,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            author_id: author_id.into(),
            genres: genres.into(),
            published_at: published_at.into(),
            price: price.into(),
            stock: stock.into(),
            version: version.into(),
        }
    }
}

pub struct CreateBookDto {
    pub title: String,
    pub author_id: Uuid,
    pub genres: Vec<String>,
    pub published_at: OffsetDateTime,
    pub price: Decimal,
    pub stock: i32,
}

pub struct GetBookDto {
    pub id: Uuid,
}

#[derive(Debug, Default)]
pub struct SearchBooksDto {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

/// Fields left as `None` keep their stored value. With `version` set, the
/// write fails with `Concurrency` unless the stored book is still at it.
#[derive(Debug, Default)]
pub struct UpdateBookDto {
    pub id: Uuid,
    pub title: Option<String>,
    pub author_id: Option<Uuid>,
    pub genres: Option<Vec<String>>,
    pub published_at: Option<OffsetDateTime>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub version: Option<i64>,
}

pub struct DeleteBookDto {
    pub id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressDto {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl From<Address> for AddressDto {
    fn from(value: Address) -> Self {
        let DestructAddress {
            street,
            city,
            state,
            postal_code,
            country,
        } = value.into_destruct();
        Self {
            street,
            city,
            state,
            postal_code,
            country,
        }
    }
}

impl From<AddressDto> for Address {
    fn from(value: AddressDto) -> Self {
        Address::new(
            value.street,
            value.city,
            value.state,
            value.postal_code,
            value.country,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: AddressDto,
    pub created_at: OffsetDateTime,
}

impl From<Customer> for CustomerDto {
    fn from(value: Customer) -> Self {
        let DestructCustomer {
            id,
            name,
            email,
            address,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            address: address.into(),
            created_at: created_at.into(),
        }
    }
}

pub struct CreateCustomerDto {
    pub name: String,
    pub email: String,
    pub address: AddressDto,
}

pub struct GetCustomerDto {
    pub id: Uuid,
}

#[derive(Debug, Default)]
pub struct UpdateCustomerDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<AddressDto>,
}

pub struct DeleteCustomerDto {
    pub id: Uuid,
}
