use kernel::interface::query::ReportQuery;
use kernel::interface::update::ReportModifier;
use kernel::prelude::entity::{SalesReport, TimeWindow};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;

pub struct MemoryReportRepository;

#[async_trait::async_trait]
impl ReportQuery for MemoryReportRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_generated_range(
        &self,
        con: &mut MemoryTransaction,
        window: &TimeWindow,
    ) -> error_stack::Result<Vec<SalesReport>, KernelError> {
        let mut found = con
            .reports
            .iter()
            .filter(|report| window.contains(report.generated_at().as_ref()))
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by_key(|report| *report.generated_at().as_ref());
        Ok(found)
    }
}

#[async_trait::async_trait]
impl ReportModifier for MemoryReportRepository {
    type Transaction = MemoryTransaction;
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        report: &SalesReport,
    ) -> error_stack::Result<(), KernelError> {
        con.push_report(report.clone());
        Ok(())
    }
}
