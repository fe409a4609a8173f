use driver::database::{
    MemoryBookRepository, MemoryCustomerRepository, MemoryDatabase, MemoryOrderRepository,
    MemoryTransaction,
};
use kernel::interface::config::{
    DeletePolicy, DependOnFulfillmentPolicy, FulfillmentPolicy, StockAtomicity,
};
use kernel::interface::database::DatabaseConnection;
use kernel::interface::query::{DependOnBookQuery, DependOnCustomerQuery, DependOnOrderQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier, DependOnOrderModifier};
use kernel::prelude::entity::{Book, BookId};
use kernel::KernelError;
use tokio_util::sync::CancellationToken;
use rust_decimal::Decimal;
use time::macros::datetime;
use uuid::Uuid;

use crate::service::{CreateAuthorService, CreateBookService, CreateCustomerService, GetBookService};
use crate::transfer::{
    AddressDto, AuthorDto, BookDto, CreateAuthorDto, CreateBookDto, CreateCustomerDto,
    CustomerDto, GetBookDto, OrderLineDto,
};

pub(crate) struct Store {
    pub db: MemoryDatabase,
    pub customer: CustomerDto,
    pub author: AuthorDto,
}

pub(crate) async fn store(
    atomicity: StockAtomicity,
    delete: DeletePolicy,
) -> error_stack::Result<Store, KernelError> {
    let db = MemoryDatabase::new(FulfillmentPolicy::new(atomicity, delete));
    let author = db
        .create_author(CreateAuthorDto {
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
            bio: "Earthsea".to_string(),
        })
        .await?;
    let customer = db
        .create_customer(CreateCustomerDto {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: AddressDto {
                street: "12 St James's Square".to_string(),
                city: "London".to_string(),
                state: String::new(),
                postal_code: "SW1Y 4JH".to_string(),
                country: "GB".to_string(),
            },
        })
        .await?;
    Ok(Store {
        db,
        customer,
        author,
    })
}

impl Store {
    pub async fn book(
        &self,
        title: &str,
        price_cents: i64,
        stock: i32,
    ) -> error_stack::Result<BookDto, KernelError> {
        self.db
            .create_book(CreateBookDto {
                title: title.to_string(),
                author_id: self.author.id,
                genres: vec!["fantasy".to_string()],
                published_at: datetime!(1968-01-01 00:00 UTC),
                price: Decimal::new(price_cents, 2),
                stock,
            })
            .await
    }

    pub async fn stock_of(&self, book: &BookDto) -> error_stack::Result<i32, KernelError> {
        let found = self.db.get_book(GetBookDto { id: book.id }).await?;
        Ok(found.stock)
    }
}

pub(crate) fn line(book: &BookDto, quantity: i32) -> OrderLineDto {
    OrderLineDto {
        book_id: book.id,
        quantity,
    }
}

pub(crate) fn missing_line(quantity: i32) -> OrderLineDto {
    OrderLineDto {
        book_id: Uuid::new_v4(),
        quantity,
    }
}

/// Cancels `token` as soon as the first book write lands, so an operation is
/// interrupted between its first and second line item.
#[derive(Clone)]
pub(crate) struct CancelAfterFirstWrite {
    db: MemoryDatabase,
    books: CancellingBooks,
}

#[derive(Clone)]
pub(crate) struct CancellingBooks {
    token: CancellationToken,
}

impl CancelAfterFirstWrite {
    pub fn new(db: MemoryDatabase, token: CancellationToken) -> Self {
        Self {
            db,
            books: CancellingBooks { token },
        }
    }
}

#[async_trait::async_trait]
impl BookModifier for CancellingBooks {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        MemoryBookRepository.create(con, book).await
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        MemoryBookRepository.update(con, book).await?;
        self.token.cancel();
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        MemoryBookRepository.delete(con, book_id).await
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for CancelAfterFirstWrite {
    type Transaction = MemoryTransaction;

    async fn transact(&self) -> error_stack::Result<MemoryTransaction, KernelError> {
        self.db.transact().await
    }
}

impl DependOnFulfillmentPolicy for CancelAfterFirstWrite {
    fn fulfillment_policy(&self) -> &FulfillmentPolicy {
        self.db.fulfillment_policy()
    }
}

impl DependOnCustomerQuery for CancelAfterFirstWrite {
    type CustomerQuery = MemoryCustomerRepository;
    fn customer_query(&self) -> &Self::CustomerQuery {
        &MemoryCustomerRepository
    }
}

impl DependOnBookQuery for CancelAfterFirstWrite {
    type BookQuery = MemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &MemoryBookRepository
    }
}

impl DependOnBookModifier for CancelAfterFirstWrite {
    type BookModifier = CancellingBooks;
    fn book_modifier(&self) -> &Self::BookModifier {
        &self.books
    }
}

impl DependOnOrderQuery for CancelAfterFirstWrite {
    type OrderQuery = MemoryOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &MemoryOrderRepository
    }
}

impl DependOnOrderModifier for CancelAfterFirstWrite {
    type OrderModifier = MemoryOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &MemoryOrderRepository
    }
}
