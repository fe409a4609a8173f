use application::transfer::{AddressDto, AuthorDto, BookDto, CustomerDto};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    id: Uuid,
    first_name: String,
    last_name: String,
    bio: String,
}

impl From<AuthorDto> for AuthorResponse {
    fn from(value: AuthorDto) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            bio: value.bio,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    id: Uuid,
    title: String,
    author_id: Uuid,
    genres: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    published_at: OffsetDateTime,
    price: Decimal,
    stock: i32,
    version: i64,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            author_id: value.author_id,
            genres: value.genres,
            published_at: value.published_at,
            price: value.price,
            stock: value.stock,
            version: value.version,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddressResponse {
    street: String,
    city: String,
    state: String,
    postal_code: String,
    country: String,
}

impl From<AddressDto> for AddressResponse {
    fn from(value: AddressDto) -> Self {
        Self {
            street: value.street,
            city: value.city,
            state: value.state,
            postal_code: value.postal_code,
            country: value.country,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    id: Uuid,
    name: String,
    email: String,
    address: AddressResponse,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl From<CustomerDto> for CustomerResponse {
    fn from(value: CustomerDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            address: value.address.into(),
            created_at: value.created_at,
        }
    }
}

pub struct Created<T>(T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

pub struct CatalogPresenter;

impl Exhaust<BookDto> for CatalogPresenter {
    type To = Json<BookResponse>;
    fn emit(&self, input: BookDto) -> Self::To {
        Json(input.into())
    }
}

impl Exhaust<CustomerDto> for CatalogPresenter {
    type To = Json<CustomerResponse>;
    fn emit(&self, input: CustomerDto) -> Self::To {
        Json(input.into())
    }
}

impl Exhaust<AuthorDto> for CatalogPresenter {
    type To = Json<AuthorResponse>;
    fn emit(&self, input: AuthorDto) -> Self::To {
        Json(input.into())
    }
}

impl Exhaust<Vec<AuthorDto>> for CatalogPresenter {
    type To = Json<Vec<AuthorResponse>>;
    fn emit(&self, input: Vec<AuthorDto>) -> Self::To {
        Json(input.into_iter().map(AuthorResponse::from).collect())
    }
}

impl Exhaust<Vec<BookDto>> for CatalogPresenter {
    type To = Json<Vec<BookResponse>>;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        Json(input.into_iter().map(BookResponse::from).collect())
    }
}

impl Exhaust<Vec<CustomerDto>> for CatalogPresenter {
    type To = Json<Vec<CustomerResponse>>;
    fn emit(&self, input: Vec<CustomerDto>) -> Self::To {
        Json(input.into_iter().map(CustomerResponse::from).collect())
    }
}

impl Exhaust<()> for CatalogPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

pub struct CreatedPresenter;

impl Exhaust<AuthorDto> for CreatedPresenter {
    type To = Created<AuthorResponse>;
    fn emit(&self, input: AuthorDto) -> Self::To {
        Created(input.into())
    }
}

impl Exhaust<BookDto> for CreatedPresenter {
    type To = Created<BookResponse>;
    fn emit(&self, input: BookDto) -> Self::To {
        Created(input.into())
    }
}

impl Exhaust<CustomerDto> for CreatedPresenter {
    type To = Created<CustomerResponse>;
    fn emit(&self, input: CustomerDto) -> Self::To {
        Created(input.into())
    }
}
