use error_stack::Report;
use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{AuthorId, Book, BookId, BookSearch};
use kernel::KernelError;

use crate::database::memory::{MemoryState, MemoryTransaction};

pub struct MemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for MemoryBookRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.books.get(id).cloned())
    }

    async fn find_by_author_id(
        &self,
        con: &mut MemoryTransaction,
        author_id: &AuthorId,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        Ok(con.books_where(|book| book.author_id() == author_id))
    }

    async fn search(
        &self,
        con: &mut MemoryTransaction,
        search: &BookSearch,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        Ok(con.books_where(|book| search.matches(book, con.authors.get(book.author_id()))))
    }
}

impl MemoryState {
    fn books_where<P>(&self, predicate: P) -> Vec<Book>
    where
        P: Fn(&Book) -> bool,
    {
        let mut found = self
            .books
            .values()
            .filter(|book| predicate(book))
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by(|a, b| {
            a.title()
                .as_ref()
                .cmp(b.title().as_ref())
                .then_with(|| a.id().as_ref().cmp(b.id().as_ref()))
        });
        found
    }
}

#[async_trait::async_trait]
impl BookModifier for MemoryBookRepository {
    type Transaction = MemoryTransaction;
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        con.write_book(book.id(), Some(book.clone()));
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        let stored = con
            .books
            .get(book.id())
            .ok_or_else(|| Report::new(KernelError::not_found("Book", book.id().as_ref())))?;
        if stored.version() != book.version() {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "book {} is at version {}, write expected {}",
                book.id().as_ref(),
                stored.version().as_ref(),
                book.version().as_ref()
            )));
        }
        let next = book.version().next();
        con.write_book(book.id(), Some(book.clone().reconstruct(|b| b.version = next)));
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        if !con.write_book(book_id, None) {
            return Err(Report::new(KernelError::not_found("Book", book_id.as_ref())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::{AuthorModifier, BookModifier};
    use kernel::prelude::entity::{
        Author, AuthorBio, AuthorFirstName, AuthorId, AuthorLastName, Book, BookGenres, BookId,
        BookPrice, BookSearch, BookStock, BookTitle, PublishedAt, Version,
    };
    use kernel::KernelError;
    use rust_decimal::Decimal;
    use time::OffsetDateTime;

    use crate::database::memory::{MemoryAuthorRepository, MemoryBookRepository, MemoryDatabase};

    fn book() -> Book {
        Book::new(
            BookId::new(uuid::Uuid::new_v4()),
            BookTitle::new("Solaris"),
            AuthorId::new(uuid::Uuid::new_v4()),
            BookGenres::new(vec!["sci-fi".to_string()]),
            PublishedAt::new(OffsetDateTime::UNIX_EPOCH),
            BookPrice::new(Decimal::new(1250, 2)),
            BookStock::new(3),
            Version::initial(),
        )
    }

    #[tokio::test]
    async fn update_bumps_version() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::default();
        let mut con = db.transact().await?;
        let book = book();
        MemoryBookRepository.create(&mut con, &book).await?;

        let changed = book.clone().reconstruct(|b| b.stock = BookStock::new(1));
        MemoryBookRepository.update(&mut con, &changed).await?;

        let found = MemoryBookRepository
            .find_by_id(&mut con, book.id())
            .await?
            .unwrap();
        assert_eq!(found.stock(), &BookStock::new(1));
        assert_eq!(found.version(), &Version::new(1));
        Ok(())
    }

    #[tokio::test]
    async fn stale_version_is_rejected() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::default();
        let mut con = db.transact().await?;
        let book = book();
        MemoryBookRepository.create(&mut con, &book).await?;
        MemoryBookRepository.update(&mut con, &book).await?;

        let stale = book.reconstruct(|b| b.stock = BookStock::new(0));
        let error = MemoryBookRepository
            .update(&mut con, &stale)
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Concurrency);
        Ok(())
    }

    #[tokio::test]
    async fn updating_a_missing_book_is_not_found() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::default();
        let mut con = db.transact().await?;
        let error = MemoryBookRepository
            .update(&mut con, &book())
            .await
            .unwrap_err();
        assert!(matches!(
            error.current_context(),
            KernelError::NotFound { entity: "Book", .. }
        ));

        let error = MemoryBookRepository
            .delete(&mut con, book().id())
            .await
            .unwrap_err();
        assert!(matches!(
            error.current_context(),
            KernelError::NotFound { entity: "Book", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn search_joins_the_author_name() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::default();
        let mut con = db.transact().await?;
        let author = Author::new(
            AuthorId::new(uuid::Uuid::new_v4()),
            AuthorFirstName::new("Stanisław"),
            AuthorLastName::new("Lem"),
            AuthorBio::default(),
        );
        MemoryAuthorRepository.create(&mut con, &author).await?;
        let solaris = book().reconstruct(|b| b.author_id = author.id().clone());
        let other = book().reconstruct(|b| b.title = BookTitle::new("Eden"));
        MemoryBookRepository.create(&mut con, &solaris).await?;
        MemoryBookRepository.create(&mut con, &other).await?;

        let by_author = MemoryBookRepository
            .search(
                &mut con,
                &BookSearch::new(None, Some("stanisław lem".to_string()), None),
            )
            .await?;
        assert_eq!(by_author, vec![solaris.clone()]);

        let by_genre = MemoryBookRepository
            .search(&mut con, &BookSearch::new(None, None, Some("sci-fi".to_string())))
            .await?;
        assert_eq!(by_genre, vec![other, solaris.clone()]);

        let written = MemoryBookRepository
            .find_by_author_id(&mut con, author.id())
            .await?;
        assert_eq!(written, vec![solaris]);
        Ok(())
    }
}
