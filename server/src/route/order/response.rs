use application::transfer::{OrderDto, OrderItemDto};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;
use crate::route::catalog::{AuthorResponse, CustomerResponse};

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    id: Uuid,
    book_id: Uuid,
    title: String,
    author_id: Uuid,
    author: Option<AuthorResponse>,
    genres: Vec<String>,
    quantity: i32,
    unit_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtotal: Option<Decimal>,
}

impl From<OrderItemDto> for OrderItemResponse {
    fn from(value: OrderItemDto) -> Self {
        Self {
            id: value.id,
            book_id: value.book_id,
            title: value.title,
            author_id: value.author_id,
            author: value.author.map(AuthorResponse::from),
            genres: value.genres,
            quantity: value.quantity,
            unit_price: value.unit_price,
            subtotal: value.subtotal,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    id: Uuid,
    customer_id: Uuid,
    customer: Option<CustomerResponse>,
    items: Vec<OrderItemResponse>,
    total: Decimal,
    status: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    version: i64,
}

impl From<OrderDto> for OrderResponse {
    fn from(value: OrderDto) -> Self {
        Self {
            id: value.id,
            customer_id: value.customer_id,
            customer: value.customer.map(CustomerResponse::from),
            items: value.items.into_iter().map(OrderItemResponse::from).collect(),
            total: value.total,
            status: value.status,
            created_at: value.created_at,
            version: value.version,
        }
    }
}

pub struct CreatedOrderResponse(OrderResponse);

impl IntoResponse for CreatedOrderResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

pub struct OrderPresenter;

impl Exhaust<OrderDto> for OrderPresenter {
    type To = Json<OrderResponse>;
    fn emit(&self, input: OrderDto) -> Self::To {
        Json(input.into())
    }
}

impl Exhaust<Vec<OrderDto>> for OrderPresenter {
    type To = Json<Vec<OrderResponse>>;
    fn emit(&self, input: Vec<OrderDto>) -> Self::To {
        Json(input.into_iter().map(OrderResponse::from).collect())
    }
}

impl Exhaust<()> for OrderPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

pub struct CreatedOrderPresenter;

impl Exhaust<OrderDto> for CreatedOrderPresenter {
    type To = CreatedOrderResponse;
    fn emit(&self, input: OrderDto) -> Self::To {
        CreatedOrderResponse(input.into())
    }
}
