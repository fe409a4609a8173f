use application::transfer::{GenerateSalesReportDto, ListSalesReportsDto};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    #[serde(with = "time::serde::rfc3339")]
    from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    to: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ListReportsRequest {
    #[serde(with = "time::serde::rfc3339")]
    from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    to: OffsetDateTime,
}

pub struct ReportTransformer;

impl Intake<GenerateReportRequest> for ReportTransformer {
    type To = GenerateSalesReportDto;
    fn emit(&self, input: GenerateReportRequest) -> Self::To {
        GenerateSalesReportDto {
            from: input.from,
            to: input.to,
        }
    }
}

impl Intake<ListReportsRequest> for ReportTransformer {
    type To = ListSalesReportsDto;
    fn emit(&self, input: ListReportsRequest) -> Self::To {
        ListSalesReportsDto {
            from: input.from,
            to: input.to,
        }
    }
}
