use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{SalesReport, TimeWindow};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ReportQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_generated_range(
        &self,
        con: &mut Self::Transaction,
        window: &TimeWindow,
    ) -> error_stack::Result<Vec<SalesReport>, KernelError>;
}

pub trait DependOnReportQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type ReportQuery: ReportQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn report_query(&self) -> &Self::ReportQuery;
}
