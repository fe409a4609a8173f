use kernel::prelude::entity::{
    DestructBookSnapshot, DestructOrder, DestructOrderItem, Order, OrderItem,
};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::{AuthorDto, CustomerDto};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDto {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer: Option<CustomerDto>,
    pub items: Vec<OrderItemDto>,
    pub total: Decimal,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub version: i64,
}

impl From<Order> for OrderDto {
    fn from(value: Order) -> Self {
        let DestructOrder {
            id,
            customer_id,
            customer,
            items,
            total,
            status,
            created_at,
            version,
        } = value.into_destruct();
        Self {
            id: id.into(),
            customer_id: customer_id.into(),
            customer: customer.map(CustomerDto::from),
            items: items.into_iter().map(OrderItemDto::from).collect(),
            total: total.into(),
            status: status.into(),
            created_at: created_at.into(),
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemDto {
    pub id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
    pub title: String,
    pub author_id: Uuid,
    pub author: Option<AuthorDto>,
    pub genres: Vec<String>,
    pub unit_price: Decimal,
    pub subtotal: Option<Decimal>,
}

impl From<OrderItem> for OrderItemDto {
    fn from(value: OrderItem) -> Self {
        let subtotal = value.subtotal();
        let DestructOrderItem {
            id,
            book_id,
            quantity,
            snapshot,
        } = value.into_destruct();
        let DestructBookSnapshot {
            title,
            author_id,
            author,
            genres,
            price,
        } = snapshot.into_destruct();
        Self {
            id: id.into(),
            book_id: book_id.into(),
            quantity: quantity.into(),
            title: title.into(),
            author_id: author_id.into(),
            author: author.map(AuthorDto::from),
            genres: genres.into(),
            unit_price: price.into(),
            subtotal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineDto {
    pub book_id: Uuid,
    pub quantity: i32,
}

pub struct CreateOrderDto {
    pub customer_id: Uuid,
    pub items: Vec<OrderLineDto>,
}

pub struct GetOrderDto {
    pub id: Uuid,
}

pub struct UpdateOrderDto {
    pub id: Uuid,
    pub items: Vec<OrderLineDto>,
}

pub struct DeleteOrderDto {
    pub id: Uuid,
}

pub struct ListOrdersByCustomerDto {
    pub customer_id: Uuid,
}

pub struct ListOrdersInRangeDto {
    pub from: OffsetDateTime,
    pub to: OffsetDateTime,
}
