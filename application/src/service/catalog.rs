use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    AuthorQuery, BookQuery, CustomerQuery, DependOnAuthorQuery, DependOnBookQuery,
    DependOnCustomerQuery, DependOnOrderQuery, OrderQuery,
};
use kernel::interface::update::{
    AuthorModifier, BookModifier, CustomerModifier, DependOnAuthorModifier, DependOnBookModifier,
    DependOnCustomerModifier,
};
use kernel::prelude::entity::{
    Author, AuthorBio, AuthorFirstName, AuthorId, AuthorLastName, AuthorSearch, Book,
    BookGenres, BookId, BookPrice, BookSearch, BookStock, BookTitle, CreatedAt, Customer,
    CustomerEmail, CustomerId, CustomerName, PublishedAt, Version,
};
use kernel::KernelError;
use uuid::Uuid;

use crate::transfer::{
    AuthorDto, BookDto, CreateAuthorDto, CreateBookDto, CreateCustomerDto, CustomerDto,
    DeleteAuthorDto, DeleteBookDto, DeleteCustomerDto, GetAuthorDto, GetBookDto,
    GetCustomerDto, SearchAuthorsDto, SearchBooksDto, UpdateAuthorDto, UpdateBookDto,
    UpdateCustomerDto,
};

fn require(condition: bool, reason: &str) -> error_stack::Result<(), KernelError> {
    if condition {
        Ok(())
    } else {
        Err(Report::new(KernelError::validation(reason)))
    }
}

async fn ensure_author<S>(
    service: &S,
    con: &mut <S::DatabaseConnection as DatabaseConnection>::Transaction,
    author_id: &AuthorId,
) -> error_stack::Result<(), KernelError>
where
    S: ?Sized + DependOnAuthorQuery,
{
    match service.author_query().find_by_id(con, author_id).await? {
        Some(_) => Ok(()),
        None => Err(Report::new(KernelError::not_found(
            "Author",
            author_id.as_ref(),
        ))),
    }
}

#[async_trait::async_trait]
pub trait CreateAuthorService: 'static + Sync + Send + DependOnAuthorModifier {
    async fn create_author(
        &self,
        dto: CreateAuthorDto,
    ) -> error_stack::Result<AuthorDto, KernelError> {
        require(
            !dto.first_name.trim().is_empty() || !dto.last_name.trim().is_empty(),
            "author needs a name",
        )?;
        let author = Author::new(
            AuthorId::new(Uuid::new_v4()),
            AuthorFirstName::new(dto.first_name),
            AuthorLastName::new(dto.last_name),
            AuthorBio::new(dto.bio),
        );
        let mut con = self.database_connection().transact().await?;
        self.author_modifier().create(&mut con, &author).await?;
        con.commit().await?;
        Ok(author.into())
    }
}

impl<T> CreateAuthorService for T where T: DependOnAuthorModifier {}

#[async_trait::async_trait]
pub trait CreateBookService:
    'static + Sync + Send + DependOnAuthorQuery + DependOnBookModifier
{
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        require(!dto.title.trim().is_empty(), "book title must not be empty")?;
        require(dto.stock >= 0, "stock must not be negative")?;
        let price = BookPrice::parse(dto.price)?;

        let author_id = AuthorId::new(dto.author_id);
        let mut con = self.database_connection().transact().await?;
        ensure_author(self, &mut con, &author_id).await?;

        let book = Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new(dto.title),
            author_id,
            BookGenres::new(dto.genres),
            PublishedAt::new(dto.published_at),
            price,
            BookStock::new(dto.stock),
            Version::initial(),
        );
        self.book_modifier().create(&mut con, &book).await?;
        con.commit().await?;
        Ok(book.into())
    }
}

impl<T> CreateBookService for T where T: DependOnAuthorQuery + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<BookDto, KernelError> {
        let id = BookId::new(dto.id);
        let mut con = self.database_connection().transact().await?;
        let book = self.book_query().find_by_id(&mut con, &id).await?;
        con.commit().await?;
        book.map(BookDto::from)
            .ok_or_else(|| Report::new(KernelError::not_found("Book", id.as_ref())))
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait SearchBooksService: 'static + Sync + Send + DependOnBookQuery {
    async fn search_books(
        &self,
        dto: SearchBooksDto,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let search = BookSearch::new(dto.title, dto.author, dto.genre);
        let mut con = self.database_connection().transact().await?;
        let books = self.book_query().search(&mut con, &search).await?;
        con.commit().await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> SearchBooksService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static + Sync + Send + DependOnAuthorQuery + DependOnBookQuery + DependOnBookModifier
{
    async fn update_book(&self, dto: UpdateBookDto) -> error_stack::Result<BookDto, KernelError> {
        if let Some(title) = &dto.title {
            require(!title.trim().is_empty(), "book title must not be empty")?;
        }
        if let Some(stock) = dto.stock {
            require(stock >= 0, "stock must not be negative")?;
        }
        let price = dto.price.map(BookPrice::parse).transpose()?;

        let id = BookId::new(dto.id);
        let mut con = self.database_connection().transact().await?;
        let stored = self
            .book_query()
            .find_by_id(&mut con, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("Book", id.as_ref())))?;
        if let Some(author_id) = dto.author_id.map(AuthorId::new) {
            ensure_author(self, &mut con, &author_id).await?;
        }

        let changed = stored.reconstruct(|b| {
            if let Some(title) = dto.title {
                b.title = BookTitle::new(title);
            }
            if let Some(author_id) = dto.author_id {
                b.author_id = AuthorId::new(author_id);
            }
            if let Some(genres) = dto.genres {
                b.genres = BookGenres::new(genres);
            }
            if let Some(published_at) = dto.published_at {
                b.published_at = PublishedAt::new(published_at);
            }
            if let Some(price) = price {
                b.price = price;
            }
            if let Some(stock) = dto.stock {
                b.stock = BookStock::new(stock);
            }
            if let Some(version) = dto.version {
                b.version = Version::new(version);
            }
        });
        self.book_modifier().update(&mut con, &changed).await?;
        let updated = self.book_query().find_by_id(&mut con, &id).await?;
        con.commit().await?;

        let updated = updated
            .ok_or_else(|| Report::new(KernelError::not_found("Book", id.as_ref())))?;
        tracing::info!(
            book_id = %id.as_ref(),
            version = updated.version().as_ref(),
            "Book updated"
        );
        Ok(updated.into())
    }
}

impl<T> UpdateBookService for T where
    T: DependOnAuthorQuery + DependOnBookQuery + DependOnBookModifier
{
}

#[async_trait::async_trait]
pub trait DeleteBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let id = BookId::new(dto.id);
        let mut con = self.database_connection().transact().await?;
        self.book_modifier().delete(&mut con, &id).await?;
        con.commit().await?;
        tracing::info!(book_id = %id.as_ref(), "Book deleted");
        Ok(())
    }
}

impl<T> DeleteBookService for T where T: DependOnBookModifier {}

#[async_trait::async_trait]
pub trait GetAuthorService: 'static + Sync + Send + DependOnAuthorQuery {
    async fn get_author(&self, dto: GetAuthorDto) -> error_stack::Result<AuthorDto, KernelError> {
        let id = AuthorId::new(dto.id);
        let mut con = self.database_connection().transact().await?;
        let author = self.author_query().find_by_id(&mut con, &id).await?;
        con.commit().await?;
        author
            .map(AuthorDto::from)
            .ok_or_else(|| Report::new(KernelError::not_found("Author", id.as_ref())))
    }

    async fn search_authors(
        &self,
        dto: SearchAuthorsDto,
    ) -> error_stack::Result<Vec<AuthorDto>, KernelError> {
        let search = AuthorSearch::new(dto.first_name, dto.last_name);
        let mut con = self.database_connection().transact().await?;
        let authors = self.author_query().search(&mut con, &search).await?;
        con.commit().await?;
        Ok(authors.into_iter().map(AuthorDto::from).collect())
    }
}

impl<T> GetAuthorService for T where T: DependOnAuthorQuery {}

#[async_trait::async_trait]
pub trait UpdateAuthorService:
    'static + Sync + Send + DependOnAuthorQuery + DependOnAuthorModifier
{
    async fn update_author(
        &self,
        dto: UpdateAuthorDto,
    ) -> error_stack::Result<AuthorDto, KernelError> {
        let id = AuthorId::new(dto.id);
        let mut con = self.database_connection().transact().await?;
        let stored = self
            .author_query()
            .find_by_id(&mut con, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("Author", id.as_ref())))?;
        let changed = stored.reconstruct(|a| {
            if let Some(first_name) = dto.first_name {
                a.first_name = AuthorFirstName::new(first_name);
            }
            if let Some(last_name) = dto.last_name {
                a.last_name = AuthorLastName::new(last_name);
            }
            if let Some(bio) = dto.bio {
                a.bio = AuthorBio::new(bio);
            }
        });
        require(
            !changed.first_name().as_ref().trim().is_empty()
                || !changed.last_name().as_ref().trim().is_empty(),
            "author needs a name",
        )?;
        self.author_modifier().update(&mut con, &changed).await?;
        con.commit().await?;
        Ok(changed.into())
    }
}

impl<T> UpdateAuthorService for T where T: DependOnAuthorQuery + DependOnAuthorModifier {}

#[async_trait::async_trait]
pub trait DeleteAuthorService:
    'static + Sync + Send + DependOnBookQuery + DependOnAuthorModifier
{
    async fn delete_author(&self, dto: DeleteAuthorDto) -> error_stack::Result<(), KernelError> {
        let id = AuthorId::new(dto.id);
        let mut con = self.database_connection().transact().await?;
        let books = self.book_query().find_by_author_id(&mut con, &id).await?;
        if !books.is_empty() {
            return Err(Report::new(KernelError::validation(format!(
                "author {} still has {} book(s) in the catalog",
                id.as_ref(),
                books.len()
            ))));
        }
        self.author_modifier().delete(&mut con, &id).await?;
        con.commit().await?;
        tracing::info!(author_id = %id.as_ref(), "Author deleted");
        Ok(())
    }
}

impl<T> DeleteAuthorService for T where T: DependOnBookQuery + DependOnAuthorModifier {}

#[async_trait::async_trait]
pub trait CreateCustomerService: 'static + Sync + Send + DependOnCustomerModifier {
    async fn create_customer(
        &self,
        dto: CreateCustomerDto,
    ) -> error_stack::Result<CustomerDto, KernelError> {
        require(!dto.name.trim().is_empty(), "customer name must not be empty")?;
        require(dto.email.contains('@'), "customer email is not valid")?;
        let customer = Customer::new(
            CustomerId::new(Uuid::new_v4()),
            CustomerName::new(dto.name),
            CustomerEmail::new(dto.email),
            dto.address.into(),
            CreatedAt::now(),
        );
        let mut con = self.database_connection().transact().await?;
        self.customer_modifier().create(&mut con, &customer).await?;
        con.commit().await?;
        Ok(customer.into())
    }
}

impl<T> CreateCustomerService for T where T: DependOnCustomerModifier {}

#[async_trait::async_trait]
pub trait GetCustomerService: 'static + Sync + Send + DependOnCustomerQuery {
    async fn get_customer(
        &self,
        dto: GetCustomerDto,
    ) -> error_stack::Result<CustomerDto, KernelError> {
        let id = CustomerId::new(dto.id);
        let mut con = self.database_connection().transact().await?;
        let customer = self.customer_query().find_by_id(&mut con, &id).await?;
        con.commit().await?;
        customer
            .map(CustomerDto::from)
            .ok_or_else(|| Report::new(KernelError::not_found("Customer", id.as_ref())))
    }
}

impl<T> GetCustomerService for T where T: DependOnCustomerQuery {}

#[async_trait::async_trait]
pub trait ListCustomersService: 'static + Sync + Send + DependOnCustomerQuery {
    async fn list_customers(&self) -> error_stack::Result<Vec<CustomerDto>, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let customers = self.customer_query().find_all(&mut con).await?;
        con.commit().await?;
        Ok(customers.into_iter().map(CustomerDto::from).collect())
    }
}

impl<T> ListCustomersService for T where T: DependOnCustomerQuery {}

#[async_trait::async_trait]
pub trait UpdateCustomerService:
    'static + Sync + Send + DependOnCustomerQuery + DependOnCustomerModifier
{
    async fn update_customer(
        &self,
        dto: UpdateCustomerDto,
    ) -> error_stack::Result<CustomerDto, KernelError> {
        if let Some(name) = &dto.name {
            require(!name.trim().is_empty(), "customer name must not be empty")?;
        }
        if let Some(email) = &dto.email {
            require(email.contains('@'), "customer email is not valid")?;
        }
        let id = CustomerId::new(dto.id);
        let mut con = self.database_connection().transact().await?;
        let stored = self
            .customer_query()
            .find_by_id(&mut con, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("Customer", id.as_ref())))?;
        let changed = stored.reconstruct(|c| {
            if let Some(name) = dto.name {
                c.name = CustomerName::new(name);
            }
            if let Some(email) = dto.email {
                c.email = CustomerEmail::new(email);
            }
            if let Some(address) = dto.address {
                c.address = address.into();
            }
        });
        self.customer_modifier().update(&mut con, &changed).await?;
        con.commit().await?;
        Ok(changed.into())
    }
}

impl<T> UpdateCustomerService for T where T: DependOnCustomerQuery + DependOnCustomerModifier {}

#[async_trait::async_trait]
pub trait DeleteCustomerService:
    'static + Sync + Send + DependOnOrderQuery + DependOnCustomerModifier
{
    async fn delete_customer(
        &self,
        dto: DeleteCustomerDto,
    ) -> error_stack::Result<(), KernelError> {
        let id = CustomerId::new(dto.id);
        let mut con = self.database_connection().transact().await?;
        let orders = self.order_query().find_by_customer_id(&mut con, &id).await?;
        if !orders.is_empty() {
            return Err(Report::new(KernelError::validation(format!(
                "customer {} still has {} order(s)",
                id.as_ref(),
                orders.len()
            ))));
        }
        self.customer_modifier().delete(&mut con, &id).await?;
        con.commit().await?;
        tracing::info!(customer_id = %id.as_ref(), "Customer deleted");
        Ok(())
    }
}

impl<T> DeleteCustomerService for T where T: DependOnOrderQuery + DependOnCustomerModifier {}

#[cfg(test)]
mod test {
    use kernel::interface::config::{DeletePolicy, StockAtomicity};
    use kernel::KernelError;
    use rust_decimal::Decimal;
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::service::fixture::{line, store};
    use crate::service::{
        CreateBookService, CreateOrderService, DeleteAuthorService, DeleteBookService,
        DeleteCustomerService, GetAuthorService, GetBookService, GetCustomerService,
        ListCustomersService, SearchBooksService, UpdateAuthorService, UpdateBookService,
        UpdateCustomerService,
    };
    use crate::transfer::{
        CreateBookDto, CreateOrderDto, DeleteAuthorDto, DeleteBookDto, DeleteCustomerDto,
        GetAuthorDto, GetBookDto, GetCustomerDto, SearchAuthorsDto, SearchBooksDto,
        UpdateAuthorDto, UpdateBookDto, UpdateCustomerDto,
    };
    use tokio_util::sync::CancellationToken;

    fn book_for(author_id: Uuid, price: Decimal, stock: i32) -> CreateBookDto {
        CreateBookDto {
            title: "The Left Hand of Darkness".to_string(),
            author_id,
            genres: vec!["sci-fi".to_string()],
            published_at: datetime!(1969-03-01 00:00 UTC),
            price,
            stock,
        }
    }

    #[tokio::test]
    async fn created_book_can_be_read() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        let created = store
            .db
            .create_book(book_for(store.author.id, Decimal::new(1499, 2), 4))
            .await?;
        assert_eq!(created.version, 0);

        let found = store.db.get_book(GetBookDto { id: created.id }).await?;
        assert_eq!(found, created);

        let customer = store
            .db
            .get_customer(GetCustomerDto {
                id: store.customer.id,
            })
            .await?;
        assert_eq!(customer, store.customer);
        Ok(())
    }

    #[tokio::test]
    async fn book_requires_known_author() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        let error = store
            .db
            .create_book(book_for(Uuid::new_v4(), Decimal::new(1499, 2), 4))
            .await
            .unwrap_err();
        assert!(matches!(
            error.current_context(),
            KernelError::NotFound {
                entity: "Author",
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn book_rejects_negative_values() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        let price = store
            .db
            .create_book(book_for(store.author.id, Decimal::new(-1, 2), 4))
            .await
            .unwrap_err();
        assert!(matches!(price.current_context(), KernelError::Validation(_)));

        let stock = store
            .db
            .create_book(book_for(store.author.id, Decimal::ONE, -1))
            .await
            .unwrap_err();
        assert!(matches!(stock.current_context(), KernelError::Validation(_)));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_entities_are_not_found() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        let book = store
            .db
            .get_book(GetBookDto { id: Uuid::new_v4() })
            .await
            .unwrap_err();
        assert!(matches!(
            book.current_context(),
            KernelError::NotFound { entity: "Book", .. }
        ));
        let customer = store
            .db
            .get_customer(GetCustomerDto { id: Uuid::new_v4() })
            .await
            .unwrap_err();
        assert!(matches!(
            customer.current_context(),
            KernelError::NotFound {
                entity: "Customer",
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn book_rejects_prices_the_store_cannot_hold() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        let fraction = store
            .db
            .create_book(book_for(store.author.id, Decimal::new(14999, 3), 4))
            .await
            .unwrap_err();
        assert!(matches!(fraction.current_context(), KernelError::Validation(_)));

        let huge = store
            .db
            .create_book(book_for(store.author.id, Decimal::new(1_000_000_000_000, 0), 4))
            .await
            .unwrap_err();
        assert!(matches!(huge.current_context(), KernelError::Validation(_)));
        Ok(())
    }

    #[tokio::test]
    async fn update_book_changes_only_given_fields() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        let book = store.book("Earthsea", 1000, 5).await?;

        let updated = store
            .db
            .update_book(UpdateBookDto {
                id: book.id,
                price: Some(Decimal::new(1250, 2)),
                stock: Some(9),
                ..Default::default()
            })
            .await?;
        assert_eq!(updated.title, book.title);
        assert_eq!(updated.genres, book.genres);
        assert_eq!(updated.price, Decimal::new(1250, 2));
        assert_eq!(updated.stock, 9);
        assert_eq!(updated.version, book.version + 1);

        let invalid = store
            .db
            .update_book(UpdateBookDto {
                id: book.id,
                title: Some("  ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(invalid.current_context(), KernelError::Validation(_)));

        let orphaned = store
            .db
            .update_book(UpdateBookDto {
                id: book.id,
                author_id: Some(Uuid::new_v4()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            orphaned.current_context(),
            KernelError::NotFound {
                entity: "Author",
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn stale_book_version_is_a_conflict() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        let book = store.book("Earthsea", 1000, 5).await?;
        store
            .db
            .update_book(UpdateBookDto {
                id: book.id,
                stock: Some(6),
                version: Some(book.version),
                ..Default::default()
            })
            .await?;

        let stale = store
            .db
            .update_book(UpdateBookDto {
                id: book.id,
                stock: Some(1),
                version: Some(book.version),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(stale.current_context(), KernelError::Concurrency));
        assert_eq!(store.stock_of(&book).await?, 6);
        Ok(())
    }

    #[tokio::test]
    async fn deleted_book_is_gone() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        let book = store.book("Earthsea", 1000, 5).await?;
        store.db.delete_book(DeleteBookDto { id: book.id }).await?;

        let again = store
            .db
            .delete_book(DeleteBookDto { id: book.id })
            .await
            .unwrap_err();
        assert!(matches!(
            again.current_context(),
            KernelError::NotFound { entity: "Book", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn search_books_by_author_and_genre() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        let wizard = store.book("A Wizard of Earthsea", 1000, 5).await?;
        let tombs = store.book("The Tombs of Atuan", 1000, 5).await?;

        let all = store.db.search_books(SearchBooksDto::default()).await?;
        assert_eq!(all, vec![wizard.clone(), tombs.clone()]);

        let by_title = store
            .db
            .search_books(SearchBooksDto {
                title: Some("tombs".to_string()),
                ..Default::default()
            })
            .await?;
        assert_eq!(by_title, vec![tombs]);

        let by_author = store
            .db
            .search_books(SearchBooksDto {
                author: Some("le guin".to_string()),
                genre: Some("fantasy".to_string()),
                ..Default::default()
            })
            .await?;
        assert_eq!(by_author.len(), 2);

        let other_genre = store
            .db
            .search_books(SearchBooksDto {
                genre: Some("romance".to_string()),
                ..Default::default()
            })
            .await?;
        assert!(other_genre.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn author_lifecycle() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        let found = store
            .db
            .get_author(GetAuthorDto {
                id: store.author.id,
            })
            .await?;
        assert_eq!(found, store.author);

        let renamed = store
            .db
            .update_author(UpdateAuthorDto {
                id: store.author.id,
                bio: Some("Hainish Cycle".to_string()),
                ..Default::default()
            })
            .await?;
        assert_eq!(renamed.first_name, store.author.first_name);
        assert_eq!(renamed.bio, "Hainish Cycle");

        let listed = store
            .db
            .search_authors(SearchAuthorsDto {
                last_name: Some("guin".to_string()),
                ..Default::default()
            })
            .await?;
        assert_eq!(listed, vec![renamed]);

        let book = store.book("Earthsea", 1000, 5).await?;
        let referenced = store
            .db
            .delete_author(DeleteAuthorDto {
                id: store.author.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            referenced.current_context(),
            KernelError::Validation(_)
        ));

        store.db.delete_book(DeleteBookDto { id: book.id }).await?;
        store
            .db
            .delete_author(DeleteAuthorDto {
                id: store.author.id,
            })
            .await?;
        let gone = store
            .db
            .get_author(GetAuthorDto {
                id: store.author.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            gone.current_context(),
            KernelError::NotFound {
                entity: "Author",
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn customer_lifecycle() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        let updated = store
            .db
            .update_customer(UpdateCustomerDto {
                id: store.customer.id,
                email: Some("countess@example.com".to_string()),
                ..Default::default()
            })
            .await?;
        assert_eq!(updated.name, store.customer.name);
        assert_eq!(updated.email, "countess@example.com");
        assert_eq!(store.db.list_customers().await?, vec![updated]);

        let invalid = store
            .db
            .update_customer(UpdateCustomerDto {
                id: store.customer.id,
                email: Some("nowhere".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(invalid.current_context(), KernelError::Validation(_)));

        let book = store.book("Earthsea", 1000, 5).await?;
        store
            .db
            .create_order(
                &CancellationToken::new(),
                CreateOrderDto {
                    customer_id: store.customer.id,
                    items: vec![line(&book, 1)],
                },
            )
            .await?;
        let with_orders = store
            .db
            .delete_customer(DeleteCustomerDto {
                id: store.customer.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            with_orders.current_context(),
            KernelError::Validation(_)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn customer_without_orders_can_be_deleted() -> error_stack::Result<(), KernelError> {
        let store = store(StockAtomicity::PerStep, DeletePolicy::Discard).await?;
        store
            .db
            .delete_customer(DeleteCustomerDto {
                id: store.customer.id,
            })
            .await?;
        assert!(store.db.list_customers().await?.is_empty());
        Ok(())
    }
}
