use error_stack::Report;
use kernel::interface::query::AuthorQuery;
use kernel::interface::update::AuthorModifier;
use kernel::prelude::entity::{
    Author, AuthorBio, AuthorFirstName, AuthorId, AuthorLastName, AuthorSearch,
};
use kernel::KernelError;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresAuthorRepository;

#[async_trait::async_trait]
impl AuthorQuery for PostgresAuthorRepository {
    type Transaction = PostgresTransaction;
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &AuthorId,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        PgAuthorInternal::find_by_id(con, id).await
    }

    async fn search(
        &self,
        con: &mut PostgresTransaction,
        search: &AuthorSearch,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        PgAuthorInternal::search(con, search).await
    }
}

#[async_trait::async_trait]
impl AuthorModifier for PostgresAuthorRepository {
    type Transaction = PostgresTransaction;
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        author: &Author,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorInternal::create(con, author).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        author: &Author,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorInternal::update(con, author).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorInternal::delete(con, id).await
    }
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    bio: String,
}

impl From<AuthorRow> for Author {
    fn from(value: AuthorRow) -> Self {
        Author::new(
            AuthorId::new(value.id),
            AuthorFirstName::new(value.first_name),
            AuthorLastName::new(value.last_name),
            AuthorBio::new(value.bio),
        )
    }
}

pub(in crate::database) struct PgAuthorInternal;

impl PgAuthorInternal {
    pub(in crate::database) async fn find_by_id(
        con: &mut PgConnection,
        id: &AuthorId,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            SELECT id, first_name, last_name, bio
            FROM authors
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Author::from))
    }

    pub(in crate::database) async fn find_by_ids(
        con: &mut PgConnection,
        ids: &[Uuid],
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            SELECT id, first_name, last_name, bio
            FROM authors
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Author::from).collect())
    }

    async fn create(con: &mut PgConnection, author: &Author) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO authors (id, first_name, last_name, bio)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(author.id().as_ref())
        .bind(author.first_name().as_ref())
        .bind(author.last_name().as_ref())
        .bind(author.bio().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn search(
        con: &mut PgConnection,
        search: &AuthorSearch,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            SELECT id, first_name, last_name, bio
            FROM authors
            WHERE ($1::TEXT IS NULL OR LOWER(first_name) LIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL OR LOWER(last_name) LIKE '%' || $2 || '%')
            ORDER BY last_name, first_name, id
            "#,
        )
        .bind(search.first_name().as_deref())
        .bind(search.last_name().as_deref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Author::from).collect())
    }

    async fn update(con: &mut PgConnection, author: &Author) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE authors
            SET first_name = $2, last_name = $3, bio = $4
            WHERE id = $1
            "#,
        )
        .bind(author.id().as_ref())
        .bind(author.first_name().as_ref())
        .bind(author.last_name().as_ref())
        .bind(author.bio().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::not_found(
                "Author",
                author.id().as_ref(),
            )));
        }
        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &AuthorId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            DELETE FROM authors
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::not_found("Author", id.as_ref())));
        }
        Ok(())
    }
}
