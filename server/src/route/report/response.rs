use application::transfer::{BookSalesDto, SalesReportDto};
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct BookSalesResponse {
    book_id: Uuid,
    title: String,
    quantity: i64,
}

impl From<BookSalesDto> for BookSalesResponse {
    fn from(value: BookSalesDto) -> Self {
        Self {
            book_id: value.book_id,
            title: value.title,
            quantity: value.quantity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SalesReportResponse {
    id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    generated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    to: OffsetDateTime,
    total_revenue: Decimal,
    total_orders: i64,
    books: Vec<BookSalesResponse>,
}

impl From<SalesReportDto> for SalesReportResponse {
    fn from(value: SalesReportDto) -> Self {
        Self {
            id: value.id,
            generated_at: value.generated_at,
            from: value.from,
            to: value.to,
            total_revenue: value.total_revenue,
            total_orders: value.total_orders,
            books: value.books.into_iter().map(BookSalesResponse::from).collect(),
        }
    }
}

pub struct ReportPresenter;

impl Exhaust<SalesReportDto> for ReportPresenter {
    type To = Json<SalesReportResponse>;
    fn emit(&self, input: SalesReportDto) -> Self::To {
        Json(input.into())
    }
}

impl Exhaust<Vec<SalesReportDto>> for ReportPresenter {
    type To = Json<Vec<SalesReportResponse>>;
    fn emit(&self, input: Vec<SalesReportDto>) -> Self::To {
        Json(input.into_iter().map(SalesReportResponse::from).collect())
    }
}
