use application::transfer::{
    CreateOrderDto, DeleteOrderDto, GetOrderDto, ListOrdersByCustomerDto, ListOrdersInRangeDto,
    OrderLineDto, UpdateOrderDto,
};
use error_stack::Report;
use kernel::KernelError;
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::{Intake, TryIntake};
use crate::error::ErrorStatus;

#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    book_id: Uuid,
    quantity: i32,
}

impl From<OrderLineRequest> for OrderLineDto {
    fn from(value: OrderLineRequest) -> Self {
        OrderLineDto {
            book_id: value.book_id,
            quantity: value.quantity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    customer_id: Uuid,
    items: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    items: Vec<OrderLineRequest>,
}

#[derive(Debug)]
pub struct GetOrderRequest {
    id: Uuid,
}

impl GetOrderRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteOrderRequest {
    id: Uuid,
}

impl DeleteOrderRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct CustomerOrdersRequest {
    customer_id: Uuid,
}

impl CustomerOrdersRequest {
    pub fn new(customer_id: Uuid) -> Self {
        Self { customer_id }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersRequest {
    customer_id: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    from: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    to: Option<OffsetDateTime>,
}

pub enum OrderFilter {
    All,
    Customer(ListOrdersByCustomerDto),
    Range(ListOrdersInRangeDto),
}

pub struct OrderTransformer;

impl Intake<CreateOrderRequest> for OrderTransformer {
    type To = CreateOrderDto;
    fn emit(&self, input: CreateOrderRequest) -> Self::To {
        CreateOrderDto {
            customer_id: input.customer_id,
            items: input.items.into_iter().map(OrderLineDto::from).collect(),
        }
    }
}

impl Intake<(Uuid, UpdateOrderRequest)> for OrderTransformer {
    type To = UpdateOrderDto;
    fn emit(&self, input: (Uuid, UpdateOrderRequest)) -> Self::To {
        let (id, input) = input;
        UpdateOrderDto {
            id,
            items: input.items.into_iter().map(OrderLineDto::from).collect(),
        }
    }
}

impl Intake<GetOrderRequest> for OrderTransformer {
    type To = GetOrderDto;
    fn emit(&self, input: GetOrderRequest) -> Self::To {
        GetOrderDto { id: input.id }
    }
}

impl Intake<DeleteOrderRequest> for OrderTransformer {
    type To = DeleteOrderDto;
    fn emit(&self, input: DeleteOrderRequest) -> Self::To {
        DeleteOrderDto { id: input.id }
    }
}

impl Intake<CustomerOrdersRequest> for OrderTransformer {
    type To = ListOrdersByCustomerDto;
    fn emit(&self, input: CustomerOrdersRequest) -> Self::To {
        ListOrdersByCustomerDto {
            customer_id: input.customer_id,
        }
    }
}

impl TryIntake<ListOrdersRequest> for OrderTransformer {
    type To = OrderFilter;
    type Error = ErrorStatus;
    fn emit(&self, input: ListOrdersRequest) -> Result<Self::To, Self::Error> {
        match (input.customer_id, input.from, input.to) {
            (None, None, None) => Ok(OrderFilter::All),
            (Some(customer_id), None, None) => {
                Ok(OrderFilter::Customer(ListOrdersByCustomerDto { customer_id }))
            }
            (None, Some(from), Some(to)) => Ok(OrderFilter::Range(ListOrdersInRangeDto { from, to })),
            (Some(_), _, _) => Err(Report::new(KernelError::validation(
                "customer_id cannot be combined with from/to",
            ))
            .into()),
            (None, _, _) => Err(Report::new(KernelError::validation(
                "from and to must be given together",
            ))
            .into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ListOrdersRequest, OrderFilter, OrderTransformer};
    use crate::controller::TryIntake;
    use time::macros::datetime;
    use uuid::Uuid;

    #[test]
    fn list_query_selects_a_filter() {
        let all = OrderTransformer.emit(ListOrdersRequest::default());
        assert!(matches!(all, Ok(OrderFilter::All)));

        let customer_id = Uuid::new_v4();
        let by_customer = OrderTransformer.emit(ListOrdersRequest {
            customer_id: Some(customer_id),
            ..Default::default()
        });
        assert!(
            matches!(by_customer, Ok(OrderFilter::Customer(dto)) if dto.customer_id == customer_id)
        );

        let range = OrderTransformer.emit(ListOrdersRequest {
            from: Some(datetime!(2025-03-01 00:00 UTC)),
            to: Some(datetime!(2025-03-01 23:59 UTC)),
            ..Default::default()
        });
        assert!(matches!(range, Ok(OrderFilter::Range(_))));
    }

    #[test]
    fn half_open_or_mixed_queries_are_rejected() {
        let half = OrderTransformer.emit(ListOrdersRequest {
            from: Some(datetime!(2025-03-01 00:00 UTC)),
            ..Default::default()
        });
        assert!(half.is_err());

        let mixed = OrderTransformer.emit(ListOrdersRequest {
            customer_id: Some(Uuid::new_v4()),
            from: Some(datetime!(2025-03-01 00:00 UTC)),
            to: Some(datetime!(2025-03-02 00:00 UTC)),
        });
        assert!(mixed.is_err());
    }
}
