use application::service::{
    CreateOrderService, DeleteOrderService, GetOrderService, ListOrdersByCustomerService,
    ListOrdersService, UpdateOrderService,
};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::route::with_deadline;

use self::request::{
    CreateOrderRequest, CustomerOrdersRequest, DeleteOrderRequest, GetOrderRequest,
    ListOrdersRequest, OrderFilter, OrderTransformer, UpdateOrderRequest,
};
use self::response::{CreatedOrderPresenter, OrderPresenter};

mod request;
mod response;

pub trait OrderRouter {
    fn route_order(self) -> Self;
}

impl OrderRouter for Router<AppModule> {
    fn route_order(self) -> Self {
        self.route(
            "/orders",
            get(
                |State(module): State<AppModule>, Query(req): Query<ListOrdersRequest>| async move {
                    with_deadline(|token| async move {
                        Controller::new(OrderTransformer, OrderPresenter)
                            .try_intake(req)?
                            .handle(|filter| async move {
                                let pgpool = module.pgpool();
                                match filter {
                                    OrderFilter::All => pgpool.list_orders(&token).await,
                                    OrderFilter::Customer(dto) => {
                                        pgpool.list_orders_by_customer(&token, dto).await
                                    }
                                    OrderFilter::Range(dto) => {
                                        pgpool.list_orders_in_range(&token, dto).await
                                    }
                                }
                            })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .post(
                |State(module): State<AppModule>, Json(req): Json<CreateOrderRequest>| async move {
                    with_deadline(|token| async move {
                        Controller::new(OrderTransformer, CreatedOrderPresenter)
                            .intake(req)
                            .handle(|dto| async move {
                                module.pgpool().create_order(&token, dto).await
                            })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            ),
        )
        .route(
            "/orders/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    with_deadline(|token| async move {
                        Controller::new(OrderTransformer, OrderPresenter)
                            .intake(GetOrderRequest::new(id))
                            .handle(|dto| async move { module.pgpool().get_order(&token, dto).await })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateOrderRequest>| async move {
                    with_deadline(|token| async move {
                        Controller::new(OrderTransformer, OrderPresenter)
                            .intake((id, req))
                            .handle(|dto| async move {
                                module.pgpool().update_order(&token, dto).await
                            })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    with_deadline(|token| async move {
                        Controller::new(OrderTransformer, OrderPresenter)
                            .intake(DeleteOrderRequest::new(id))
                            .handle(|dto| async move {
                                module.pgpool().delete_order(&token, dto).await
                            })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            ),
        )
        .route(
            "/customers/:id/orders",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    with_deadline(|token| async move {
                        Controller::new(OrderTransformer, OrderPresenter)
                            .intake(CustomerOrdersRequest::new(id))
                            .handle(|dto| async move {
                                module.pgpool().list_orders_by_customer(&token, dto).await
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
