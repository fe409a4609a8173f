use application::transfer::{
    AddressDto, CreateAuthorDto, CreateBookDto, CreateCustomerDto, DeleteAuthorDto,
    DeleteBookDto, DeleteCustomerDto, GetAuthorDto, GetBookDto, GetCustomerDto,
    SearchAuthorsDto, SearchBooksDto, UpdateAuthorDto, UpdateBookDto, UpdateCustomerDto,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CreateAuthorRequest {
    first_name: String,
    last_name: String,
    #[serde(default)]
    bio: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    title: String,
    author_id: Uuid,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    published_at: OffsetDateTime,
    price: Decimal,
    stock: i32,
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: Uuid,
}

impl GetBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddressRequest {
    #[serde(default)]
    street: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    postal_code: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    name: String,
    email: String,
    #[serde(default)]
    address: AddressRequest,
}

#[derive(Debug)]
pub struct GetCustomerRequest {
    id: Uuid,
}

impl GetCustomerRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub enum CatalogEntry {
    Author(Uuid),
    Book(Uuid),
    Customer(Uuid),
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchAuthorsRequest {
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAuthorRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    bio: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchBooksRequest {
    title: Option<String>,
    author: Option<String>,
    genre: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookRequest {
    title: Option<String>,
    author_id: Option<Uuid>,
    genres: Option<Vec<String>>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    published_at: Option<OffsetDateTime>,
    price: Option<Decimal>,
    stock: Option<i32>,
    version: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    name: Option<String>,
    email: Option<String>,
    address: Option<AddressRequest>,
}

pub struct CatalogTransformer;

impl Intake<CreateAuthorRequest> for CatalogTransformer {
    type To = CreateAuthorDto;
    fn emit(&self, input: CreateAuthorRequest) -> Self::To {
        CreateAuthorDto {
            first_name: input.first_name,
            last_name: input.last_name,
            bio: input.bio,
        }
    }
}

impl Intake<CreateBookRequest> for CatalogTransformer {
    type To = CreateBookDto;
    fn emit(&self, input: CreateBookRequest) -> Self::To {
        CreateBookDto {
            title: input.title,
            author_id: input.author_id,
            genres: input.genres,
            published_at: input.published_at,
            price: input.price,
            stock: input.stock,
        }
    }
}

impl Intake<GetBookRequest> for CatalogTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl From<AddressRequest> for AddressDto {
    fn from(value: AddressRequest) -> Self {
        let AddressRequest {
            street,
            city,
            state,
            postal_code,
            country,
        } = value;
        AddressDto {
            street,
            city,
            state,
            postal_code,
            country,
        }
    }
}

impl Intake<CreateCustomerRequest> for CatalogTransformer {
    type To = CreateCustomerDto;
    fn emit(&self, input: CreateCustomerRequest) -> Self::To {
        CreateCustomerDto {
            name: input.name,
            email: input.email,
            address: input.address.into(),
        }
    }
}

impl Intake<GetCustomerRequest> for CatalogTransformer {
    type To = GetCustomerDto;
    fn emit(&self, input: GetCustomerRequest) -> Self::To {
        GetCustomerDto { id: input.id }
    }
}

impl Intake<CatalogEntry> for CatalogTransformer {
    type To = CatalogEntry;
    fn emit(&self, input: CatalogEntry) -> Self::To {
        input
    }
}

impl From<CatalogEntry> for GetAuthorDto {
    fn from(value: CatalogEntry) -> Self {
        GetAuthorDto { id: value.id() }
    }
}

impl From<CatalogEntry> for DeleteAuthorDto {
    fn from(value: CatalogEntry) -> Self {
        DeleteAuthorDto { id: value.id() }
    }
}

impl From<CatalogEntry> for DeleteBookDto {
    fn from(value: CatalogEntry) -> Self {
        DeleteBookDto { id: value.id() }
    }
}

impl From<CatalogEntry> for DeleteCustomerDto {
    fn from(value: CatalogEntry) -> Self {
        DeleteCustomerDto { id: value.id() }
    }
}

impl CatalogEntry {
    fn id(&self) -> Uuid {
        match self {
            CatalogEntry::Author(id) | CatalogEntry::Book(id) | CatalogEntry::Customer(id) => *id,
        }
    }
}

impl Intake<()> for CatalogTransformer {
    type To = ();
    fn emit(&self, input: ()) -> Self::To {
        input
    }
}

impl Intake<SearchAuthorsRequest> for CatalogTransformer {
    type To = SearchAuthorsDto;
    fn emit(&self, input: SearchAuthorsRequest) -> Self::To {
        SearchAuthorsDto {
            first_name: input.first_name,
            last_name: input.last_name,
        }
    }
}

impl Intake<(Uuid, UpdateAuthorRequest)> for CatalogTransformer {
    type To = UpdateAuthorDto;
    fn emit(&self, input: (Uuid, UpdateAuthorRequest)) -> Self::To {
        let (id, input) = input;
        UpdateAuthorDto {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            bio: input.bio,
        }
    }
}

impl Intake<SearchBooksRequest> for CatalogTransformer {
    type To = SearchBooksDto;
    fn emit(&self, input: SearchBooksRequest) -> Self::To {
        SearchBooksDto {
            title: input.title,
            author: input.author,
            genre: input.genre,
        }
    }
}

impl Intake<(Uuid, UpdateBookRequest)> for CatalogTransformer {
    type To = UpdateBookDto;
    fn emit(&self, input: (Uuid, UpdateBookRequest)) -> Self::To {
        let (id, input) = input;
        UpdateBookDto {
            id,
            title: input.title,
            author_id: input.author_id,
            genres: input.genres,
            published_at: input.published_at,
            price: input.price,
            stock: input.stock,
            version: input.version,
        }
    }
}

impl Intake<(Uuid, UpdateCustomerRequest)> for CatalogTransformer {
    type To = UpdateCustomerDto;
    fn emit(&self, input: (Uuid, UpdateCustomerRequest)) -> Self::To {
        let (id, input) = input;
        UpdateCustomerDto {
            id,
            name: input.name,
            email: input.email,
            address: input.address.map(AddressDto::from),
        }
    }
}
