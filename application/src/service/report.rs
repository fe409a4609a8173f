use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnOrderQuery, DependOnReportQuery, OrderQuery, ReportQuery};
use kernel::interface::update::{DependOnReportModifier, ReportModifier};
use kernel::prelude::entity::{CreatedAt, SalesReport, SalesReportId, TimeWindow};
use kernel::KernelError;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::service::ensure_active;
use crate::transfer::{GenerateSalesReportDto, ListSalesReportsDto, SalesReportDto};

#[async_trait::async_trait]
pub trait GenerateSalesReportService:
    'static + Sync + Send + DependOnOrderQuery + DependOnReportModifier
{
    /// Summarises the orders created inside `[from, to]`. A window without
    /// orders yields an empty report that is not persisted.
    async fn generate_sales_report(
        &self,
        token: &CancellationToken,
        dto: GenerateSalesReportDto,
    ) -> error_stack::Result<SalesReportDto, KernelError> {
        ensure_active(token)?;
        let window = TimeWindow::new(dto.from, dto.to)?;

        let mut con = self.database_connection().transact().await?;
        let orders = self
            .order_query()
            .find_by_created_range(&mut con, &window)
            .await?;
        ensure_active(token)?;

        let report = SalesReport::summarize(
            SalesReportId::new(Uuid::new_v4()),
            CreatedAt::now(),
            window,
            &orders,
        );
        if report.is_empty() {
            tracing::info!(
                from = %window.from(),
                to = %window.to(),
                "No orders in window, sales report not persisted"
            );
            con.roll_back().await?;
            return Ok(report.into());
        }

        self.report_modifier().create(&mut con, &report).await?;
        con.commit().await?;
        tracing::info!(
            report_id = %report.id().as_ref(),
            orders = report.total_orders(),
            revenue = %report.total_revenue().as_ref(),
            "Sales report generated"
        );
        Ok(report.into())
    }
}

impl<T> GenerateSalesReportService for T where T: DependOnOrderQuery + DependOnReportModifier {}

#[async_trait::async_trait]
pub trait ListSalesReportsService: 'static + Sync + Send + DependOnReportQuery {
    async fn list_sales_reports(
        &self,
        dto: ListSalesReportsDto,
    ) -> error_stack::Result<Vec<SalesReportDto>, KernelError> {
        let window = TimeWindow::new(dto.from, dto.to)?;
        let mut con = self.database_connection().transact().await?;
        let reports = self
            .report_query()
            .find_by_generated_range(&mut con, &window)
            .await?;
        con.commit().await?;
        Ok(reports.into_iter().map(SalesReportDto::from).collect())
    }
}

impl<T> ListSalesReportsService for T where T: DependOnReportQuery {}
