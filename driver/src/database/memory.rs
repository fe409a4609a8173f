mod author;
mod book;
mod customer;
mod order;
mod report;

pub use self::{author::*, book::*, customer::*, order::*, report::*};
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Deref;
use std::sync::Arc;

use kernel::interface::config::{DependOnFulfillmentPolicy, FulfillmentPolicy};
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnAuthorQuery, DependOnBookQuery, DependOnCustomerQuery, DependOnOrderQuery,
    DependOnReportQuery,
};
use kernel::interface::update::{
    DependOnAuthorModifier, DependOnBookModifier, DependOnCustomerModifier, DependOnOrderModifier,
    DependOnReportModifier,
};
use kernel::prelude::entity::{
    Author, AuthorId, Book, BookId, Customer, CustomerId, Order, OrderId, SalesReport,
};
use kernel::KernelError;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct MemoryState {
    authors: HashMap<AuthorId, Author>,
    books: HashMap<BookId, Book>,
    customers: HashMap<CustomerId, Customer>,
    orders: HashMap<OrderId, Order>,
    reports: Vec<SalesReport>,
}

/// A transaction holds the whole state until it commits or is dropped.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
    policy: FulfillmentPolicy,
}

impl MemoryDatabase {
    pub fn new(policy: FulfillmentPolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            policy,
        }
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Transaction = MemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = self.state.clone().lock_owned().await;
        Ok(MemoryTransaction {
            guard,
            undo: Vec::new(),
        })
    }
}

enum Undo {
    Author(AuthorId, Option<Author>),
    Book(BookId, Option<Book>),
    Customer(CustomerId, Option<Customer>),
    Order(OrderId, Option<Order>),
    Reports(usize),
}

fn swap<K: Eq + Hash, V>(map: &mut HashMap<K, V>, key: K, value: Option<V>) -> Option<V> {
    match value {
        Some(value) => map.insert(key, value),
        None => map.remove(&key),
    }
}

/// Writes go straight to the shared state and are journaled; dropping the
/// transaction uncommitted replays the journal backwards.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    undo: Vec<Undo>,
}

impl MemoryTransaction {
    fn write_author(&mut self, id: &AuthorId, author: Option<Author>) -> bool {
        let previous = swap(&mut self.guard.authors, id.clone(), author);
        let existed = previous.is_some();
        self.undo.push(Undo::Author(id.clone(), previous));
        existed
    }

    fn write_book(&mut self, id: &BookId, book: Option<Book>) -> bool {
        let previous = swap(&mut self.guard.books, id.clone(), book);
        let existed = previous.is_some();
        self.undo.push(Undo::Book(id.clone(), previous));
        existed
    }

    fn write_customer(&mut self, id: &CustomerId, customer: Option<Customer>) -> bool {
        let previous = swap(&mut self.guard.customers, id.clone(), customer);
        let existed = previous.is_some();
        self.undo.push(Undo::Customer(id.clone(), previous));
        existed
    }

    fn write_order(&mut self, id: &OrderId, order: Option<Order>) -> bool {
        let previous = swap(&mut self.guard.orders, id.clone(), order);
        let existed = previous.is_some();
        self.undo.push(Undo::Order(id.clone(), previous));
        existed
    }

    fn push_report(&mut self, report: SalesReport) {
        self.undo.push(Undo::Reports(self.guard.reports.len()));
        self.guard.reports.push(report);
    }
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(mut self) -> error_stack::Result<(), KernelError> {
        self.undo.clear();
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        let state = &mut *self.guard;
        while let Some(undo) = self.undo.pop() {
            match undo {
                Undo::Author(id, previous) => {
                    swap(&mut state.authors, id, previous);
                }
                Undo::Book(id, previous) => {
                    swap(&mut state.books, id, previous);
                }
                Undo::Customer(id, previous) => {
                    swap(&mut state.customers, id, previous);
                }
                Undo::Order(id, previous) => {
                    swap(&mut state.orders, id, previous);
                }
                Undo::Reports(len) => state.reports.truncate(len),
            }
        }
    }
}

impl Deref for MemoryTransaction {
    type Target = MemoryState;
    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl DependOnFulfillmentPolicy for MemoryDatabase {
    fn fulfillment_policy(&self) -> &FulfillmentPolicy {
        &self.policy
    }
}

impl DependOnAuthorQuery for MemoryDatabase {
    type AuthorQuery = MemoryAuthorRepository;
    fn author_query(&self) -> &Self::AuthorQuery {
        &MemoryAuthorRepository
    }
}

impl DependOnAuthorModifier for MemoryDatabase {
    type AuthorModifier = MemoryAuthorRepository;
    fn author_modifier(&self) -> &Self::AuthorModifier {
        &MemoryAuthorRepository
    }
}

impl DependOnBookQuery for MemoryDatabase {
    type BookQuery = MemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &MemoryBookRepository
    }
}

impl DependOnBookModifier for MemoryDatabase {
    type BookModifier = MemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &MemoryBookRepository
    }
}

impl DependOnCustomerQuery for MemoryDatabase {
    type CustomerQuery = MemoryCustomerRepository;
    fn customer_query(&self) -> &Self::CustomerQuery {
        &MemoryCustomerRepository
    }
}

impl DependOnCustomerModifier for MemoryDatabase {
    type CustomerModifier = MemoryCustomerRepository;
    fn customer_modifier(&self) -> &Self::CustomerModifier {
        &MemoryCustomerRepository
    }
}

impl DependOnOrderQuery for MemoryDatabase {
    type OrderQuery = MemoryOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &MemoryOrderRepository
    }
}

impl DependOnOrderModifier for MemoryDatabase {
    type OrderModifier = MemoryOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &MemoryOrderRepository
    }
}

impl DependOnReportQuery for MemoryDatabase {
    type ReportQuery = MemoryReportRepository;
    fn report_query(&self) -> &Self::ReportQuery {
        &MemoryReportRepository
    }
}

impl DependOnReportModifier for MemoryDatabase {
    type ReportModifier = MemoryReportRepository;
    fn report_modifier(&self) -> &Self::ReportModifier {
        &MemoryReportRepository
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::AuthorQuery;
    use kernel::interface::update::AuthorModifier;
    use kernel::prelude::entity::{
        Author, AuthorBio, AuthorFirstName, AuthorId, AuthorLastName, AuthorSearch,
    };
    use kernel::KernelError;

    use crate::database::memory::{MemoryAuthorRepository, MemoryDatabase};

    fn author() -> Author {
        Author::new(
            AuthorId::new(uuid::Uuid::new_v4()),
            AuthorFirstName::new("Ursula"),
            AuthorLastName::new("Le Guin"),
            AuthorBio::new(""),
        )
    }

    #[tokio::test]
    async fn committed_writes_are_visible() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::default();
        let author = author();

        let mut con = db.transact().await?;
        MemoryAuthorRepository.create(&mut con, &author).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = MemoryAuthorRepository.find_by_id(&mut con, author.id()).await?;
        assert_eq!(found, Some(author));
        Ok(())
    }

    #[tokio::test]
    async fn dropped_transaction_discards_writes() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::default();
        let author = author();

        let mut con = db.transact().await?;
        MemoryAuthorRepository.create(&mut con, &author).await?;
        drop(con);

        let mut con = db.transact().await?;
        MemoryAuthorRepository.create(&mut con, &author).await?;
        con.roll_back().await?;

        let mut con = db.transact().await?;
        let found = MemoryAuthorRepository.find_by_id(&mut con, author.id()).await?;
        assert!(found.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn rollback_restores_overwritten_and_removed_rows() -> error_stack::Result<(), KernelError>
    {
        let db = MemoryDatabase::default();
        let kept = author();
        let renamed = kept
            .clone()
            .reconstruct(|a| a.first_name = AuthorFirstName::new("U. K."));
        let removed = author();

        let mut con = db.transact().await?;
        MemoryAuthorRepository.create(&mut con, &kept).await?;
        MemoryAuthorRepository.create(&mut con, &removed).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        MemoryAuthorRepository.update(&mut con, &renamed).await?;
        MemoryAuthorRepository.update(&mut con, &renamed.clone().reconstruct(|a| {
            a.bio = AuthorBio::new("twice")
        }))
        .await?;
        MemoryAuthorRepository.delete(&mut con, removed.id()).await?;
        MemoryAuthorRepository.create(&mut con, &author()).await?;
        drop(con);

        let mut con = db.transact().await?;
        let all = MemoryAuthorRepository
            .search(&mut con, &AuthorSearch::default())
            .await?;
        assert_eq!(all.len(), 2);
        assert!(all.contains(&kept));
        assert!(all.contains(&removed));
        Ok(())
    }
}
