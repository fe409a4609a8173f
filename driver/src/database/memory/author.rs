use error_stack::Report;
use kernel::interface::query::AuthorQuery;
use kernel::interface::update::AuthorModifier;
use kernel::prelude::entity::{Author, AuthorId, AuthorSearch};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;

pub struct MemoryAuthorRepository;

#[async_trait::async_trait]
impl AuthorQuery for MemoryAuthorRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &AuthorId,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        Ok(con.authors.get(id).cloned())
    }

    async fn search(
        &self,
        con: &mut MemoryTransaction,
        search: &AuthorSearch,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        let mut found = con
            .authors
            .values()
            .filter(|author| search.matches(author))
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by(|a, b| {
            a.last_name()
                .as_ref()
                .cmp(b.last_name().as_ref())
                .then_with(|| a.first_name().as_ref().cmp(b.first_name().as_ref()))
                .then_with(|| a.id().as_ref().cmp(b.id().as_ref()))
        });
        Ok(found)
    }
}

#[async_trait::async_trait]
impl AuthorModifier for MemoryAuthorRepository {
    type Transaction = MemoryTransaction;
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        author: &Author,
    ) -> error_stack::Result<(), KernelError> {
        con.write_author(author.id(), Some(author.clone()));
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        author: &Author,
    ) -> error_stack::Result<(), KernelError> {
        if !con.authors.contains_key(author.id()) {
            return Err(Report::new(KernelError::not_found(
                "Author",
                author.id().as_ref(),
            )));
        }
        con.write_author(author.id(), Some(author.clone()));
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut MemoryTransaction,
        id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        if !con.write_author(id, None) {
            return Err(Report::new(KernelError::not_found("Author", id.as_ref())));
        }
        Ok(())
    }
}
