mod author;
mod book;
mod customer;
mod order;
mod report;

pub use self::{author::*, book::*, customer::*, order::*, report::*};
use std::ops::{Deref, DerefMut};

use error_stack::ResultExt;
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
use kernel::KernelError;
use sqlx::{PgConnection, Pool, Postgres};

use crate::env;
use crate::error::ConvertError;

static POSTGRES_URL: &str = "POSTGRES_URL";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
    policy: FulfillmentPolicy,
}

impl PostgresDatabase {
    pub async fn new(policy: FulfillmentPolicy) -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = Pool::connect(&url)
            .await
            .convert_error()
            .attach_printable_lazy(|| "Failed to connect to postgres")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .convert_error()?;
        Ok(Self { pool, policy })
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let con = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(con))
    }
}

pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DependOnFulfillmentPolicy for PostgresDatabase {
    fn fulfillment_policy(&self) -> &FulfillmentPolicy {
        &self.policy
    }
}

impl DependOnAuthorQuery for PostgresDatabase {
    type AuthorQuery = PostgresAuthorRepository;
    fn author_query(&self) -> &Self::AuthorQuery {
        &PostgresAuthorRepository
    }
}

impl DependOnAuthorModifier for PostgresDatabase {
    type AuthorModifier = PostgresAuthorRepository;
    fn author_modifier(&self) -> &Self::AuthorModifier {
        &PostgresAuthorRepository
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnCustomerQuery for PostgresDatabase {
    type CustomerQuery = PostgresCustomerRepository;
    fn customer_query(&self) -> &Self::CustomerQuery {
        &PostgresCustomerRepository
    }
}

impl DependOnCustomerModifier for PostgresDatabase {
    type CustomerModifier = PostgresCustomerRepository;
    fn customer_modifier(&self) -> &Self::CustomerModifier {
        &PostgresCustomerRepository
    }
}

impl DependOnOrderQuery for PostgresDatabase {
    type OrderQuery = PostgresOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &PostgresOrderRepository
    }
}

impl DependOnOrderModifier for PostgresDatabase {
    type OrderModifier = PostgresOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &PostgresOrderRepository
    }
}

impl DependOnReportQuery for PostgresDatabase {
    type ReportQuery = PostgresReportRepository;
    fn report_query(&self) -> &Self::ReportQuery {
        &PostgresReportRepository
    }
}

impl DependOnReportModifier for PostgresDatabase {
    type ReportModifier = PostgresReportRepository;
    fn report_modifier(&self) -> &Self::ReportModifier {
        &PostgresReportRepository
    }
}
