use application::service::{GenerateSalesReportService, ListSalesReportsService};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::route::with_deadline;

use self::request::{GenerateReportRequest, ListReportsRequest, ReportTransformer};
use self::response::ReportPresenter;

mod request;
mod response;

pub trait ReportRouter {
    fn route_report(self) -> Self;
}

impl ReportRouter for Router<AppModule> {
    fn route_report(self) -> Self {
        self.route(
            "/reports",
            get(
                |State(module): State<AppModule>, Query(req): Query<ListReportsRequest>| async move {
                    with_deadline(|_| async move {
                        Controller::new(ReportTransformer, ReportPresenter)
                            .intake(req)
                            .handle(|dto| async move {
                                module.pgpool().list_sales_reports(dto).await
                            })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .post(
                |State(module): State<AppModule>, Json(req): Json<GenerateReportRequest>| async move {
                    with_deadline(|token| async move {
                        Controller::new(ReportTransformer, ReportPresenter)
                            .intake(req)
                            .handle(|dto| async move {
                                module.pgpool().generate_sales_report(&token, dto).await
                            })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            ),
        )
    }
}
