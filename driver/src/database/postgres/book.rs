use error_stack::Report;
use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    AuthorId, Book, BookGenres, BookId, BookPrice, BookSearch, BookStock, BookTitle, PublishedAt,
    Version,
};
use kernel::KernelError;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_by_author_id(
        &self,
        con: &mut PostgresTransaction,
        author_id: &AuthorId,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_by_author_id(con, author_id).await
    }

    async fn search(
        &self,
        con: &mut PostgresTransaction,
        search: &BookSearch,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::search(con, search).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    author_id: Uuid,
    genres: Vec<String>,
    published_at: OffsetDateTime,
    price: Decimal,
    stock: i32,
    version: i64,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            AuthorId::new(value.author_id),
            BookGenres::new(value.genres),
            PublishedAt::new(value.published_at),
            BookPrice::new(value.price),
            BookStock::new(value.stock),
            Version::new(value.version),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author_id, genres, published_at, price, stock, version
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_by_author_id(
        con: &mut PgConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author_id, genres, published_at, price, stock, version
            FROM books
            WHERE author_id = $1
            ORDER BY title, id
            "#,
        )
        .bind(author_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn search(
        con: &mut PgConnection,
        search: &BookSearch,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT b.id, b.title, b.author_id, b.genres, b.published_at, b.price, b.stock, b.version
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE ($1::TEXT IS NULL OR b.title ILIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL OR LOWER(a.first_name || ' ' || a.last_name) LIKE '%' || LOWER($2) || '%')
              AND ($3::TEXT IS NULL OR $3 = ANY(b.genres))
            ORDER BY b.title, b.id
            "#,
        )
        .bind(search.title().as_deref())
        .bind(search.author().as_deref())
        .bind(search.genre().as_deref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author_id, genres, published_at, price, stock, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author_id().as_ref())
        .bind(book.genres().as_ref())
        .bind(book.published_at().as_ref())
        .bind(book.price().as_ref())
        .bind(book.stock().as_ref())
        .bind(book.version().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $3, author_id = $4, genres = $5, published_at = $6, price = $7, stock = $8,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.version().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author_id().as_ref())
        .bind(book.genres().as_ref())
        .bind(book.published_at().as_ref())
        .bind(book.price().as_ref())
        .bind(book.stock().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;

        if result.rows_affected() == 0 {
            let exists = Self::find_by_id(con, book.id()).await?.is_some();
            return Err(if exists {
                Report::new(KernelError::Concurrency).attach_printable(format!(
                    "book {} was modified after version {}",
                    book.id().as_ref(),
                    book.version().as_ref()
                ))
            } else {
                Report::new(KernelError::not_found("Book", book.id().as_ref()))
            });
        }
        Ok(())
    }

    async fn delete(con: &mut PgConnection, book_id: &BookId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::not_found("Book", book_id.as_ref())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use kernel::interface::config::FulfillmentPolicy;
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::{AuthorModifier, BookModifier};
    use kernel::prelude::entity::{
        Author, AuthorBio, AuthorFirstName, AuthorId, AuthorLastName, Book, BookGenres, BookId,
        BookPrice, BookSearch, BookStock, BookTitle, OrderQuantity, PublishedAt, Version,
    };
    use kernel::KernelError;
    use rust_decimal::Decimal;
    use time::macros::datetime;

    use crate::database::postgres::{
        PostgresAuthorRepository, PostgresBookRepository, PostgresDatabase,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new(FulfillmentPolicy::default()).await?;
        let mut con = db.transact().await?;
        let author = Author::new(
            AuthorId::new(uuid::Uuid::new_v4()),
            AuthorFirstName::new("Frank"),
            AuthorLastName::new("Herbert"),
            AuthorBio::default(),
        );
        PostgresAuthorRepository.create(&mut con, &author).await?;

        let id = BookId::new(uuid::Uuid::new_v4());
        let book = Book::new(
            id.clone(),
            BookTitle::new("Dune"),
            author.id().clone(),
            BookGenres::new(vec!["sci-fi".to_string()]),
            PublishedAt::new(datetime!(1965-08-01 00:00 UTC)),
            BookPrice::new(Decimal::new(1000, 2)),
            BookStock::new(5),
            Version::initial(),
        );
        PostgresBookRepository.create(&mut con, &book).await?;

        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(book.clone()));

        let searched = PostgresBookRepository
            .search(
                &mut con,
                &BookSearch::new(
                    Some("DUN".to_string()),
                    Some("frank herb".to_string()),
                    Some("sci-fi".to_string()),
                ),
            )
            .await?;
        assert_eq!(searched, vec![book.clone()]);
        let wrong_genre = PostgresBookRepository
            .search(
                &mut con,
                &BookSearch::new(Some("dune".to_string()), None, Some("sci".to_string())),
            )
            .await?;
        assert!(wrong_genre.is_empty());
        let written = PostgresBookRepository
            .find_by_author_id(&mut con, author.id())
            .await?;
        assert_eq!(written, vec![book.clone()]);

        let deducted = book.clone().reconstruct(|b| b.stock = BookStock::new(3));
        PostgresBookRepository.update(&mut con, &deducted).await?;

        let found = PostgresBookRepository
            .find_by_id(&mut con, &id)
            .await?
            .unwrap();
        assert_eq!(found.stock(), &BookStock::new(3));
        assert_eq!(found.version(), &Version::new(1));

        let error = PostgresBookRepository
            .update(&mut con, &deducted)
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Concurrency);

        PostgresBookRepository.delete(&mut con, &id).await?;
        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert!(found.is_none());
        let error = PostgresBookRepository
            .delete(&mut con, &id)
            .await
            .unwrap_err();
        assert!(matches!(
            error.current_context(),
            KernelError::NotFound { entity: "Book", .. }
        ));

        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn racing_writers_on_one_book() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new(FulfillmentPolicy::default()).await?;
        let author = Author::new(
            AuthorId::new(uuid::Uuid::new_v4()),
            AuthorFirstName::new("Iain"),
            AuthorLastName::new("Banks"),
            AuthorBio::default(),
        );
        let book = Book::new(
            BookId::new(uuid::Uuid::new_v4()),
            BookTitle::new("Excession"),
            author.id().clone(),
            BookGenres::new(vec!["sci-fi".to_string()]),
            PublishedAt::new(datetime!(1996-01-01 00:00 UTC)),
            BookPrice::new(Decimal::new(1200, 2)),
            BookStock::new(5),
            Version::initial(),
        );
        let mut setup = db.transact().await?;
        PostgresAuthorRepository.create(&mut setup, &author).await?;
        PostgresBookRepository.create(&mut setup, &book).await?;
        setup.commit().await?;

        let mut first = db.transact().await?;
        let taken = book.clone().deduct(&OrderQuantity::new(2))?;
        PostgresBookRepository.update(&mut first, &taken).await?;

        let racer = {
            let db = db.clone();
            let taken = book.clone().deduct(&OrderQuantity::new(4))?;
            tokio::spawn(async move {
                let mut second = db.transact().await?;
                PostgresBookRepository.update(&mut second, &taken).await?;
                second.commit().await
            })
        };
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!racer.is_finished());
        first.commit().await?;

        let error = racer.await.unwrap().unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Concurrency);

        let mut check = db.transact().await?;
        let stored = PostgresBookRepository
            .find_by_id(&mut check, book.id())
            .await?
            .unwrap();
        assert_eq!(stored.stock(), &BookStock::new(3));
        assert_eq!(stored.version(), &Version::new(1));
        PostgresBookRepository.delete(&mut check, book.id()).await?;
        PostgresAuthorRepository.delete(&mut check, author.id()).await?;
        check.commit().await
    }
}
