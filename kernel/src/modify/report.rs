use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::SalesReport;
use crate::KernelError;

#[async_trait::async_trait]
pub trait ReportModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        report: &SalesReport,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnReportModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type ReportModifier: ReportModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn report_modifier(&self) -> &Self::ReportModifier;
}
