use application::service::{
    CreateAuthorService, CreateBookService, CreateCustomerService, DeleteAuthorService,
    DeleteBookService, DeleteCustomerService, GetAuthorService, GetBookService,
    GetCustomerService, ListCustomersService, SearchBooksService, UpdateAuthorService,
    UpdateBookService, UpdateCustomerService,
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
    CatalogEntry, CatalogTransformer, CreateAuthorRequest, CreateBookRequest,
    CreateCustomerRequest, GetBookRequest, GetCustomerRequest, SearchAuthorsRequest,
    SearchBooksRequest, UpdateAuthorRequest, UpdateBookRequest, UpdateCustomerRequest,
};
use self::response::{CatalogPresenter, CreatedPresenter};

pub(crate) use self::response::{AuthorResponse, CustomerResponse};

mod request;
mod response;

pub trait CatalogRouter {
    fn route_catalog(self) -> Self;
}

impl CatalogRouter for Router<AppModule> {
    fn route_catalog(self) -> Self {
        self.route(
            "/authors",
            get(
                |State(module): State<AppModule>, Query(req): Query<SearchAuthorsRequest>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CatalogPresenter)
                            .intake(req)
                            .handle(|dto| async move { module.pgpool().search_authors(dto).await })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .post(
                |State(module): State<AppModule>, Json(req): Json<CreateAuthorRequest>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CreatedPresenter)
                            .intake(req)
                            .handle(|dto| async move { module.pgpool().create_author(dto).await })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            ),
        )
        .route(
            "/authors/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CatalogPresenter)
                            .intake(CatalogEntry::Author(id))
                            .handle(|entry| async move {
                                module.pgpool().get_author(entry.into()).await
                            })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateAuthorRequest>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CatalogPresenter)
                            .intake((id, req))
                            .handle(|dto| async move { module.pgpool().update_author(dto).await })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CatalogPresenter)
                            .intake(CatalogEntry::Author(id))
                            .handle(|entry| async move {
                                module.pgpool().delete_author(entry.into()).await
                            })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            ),
        )
        .route(
            "/books",
            get(
                |State(module): State<AppModule>, Query(req): Query<SearchBooksRequest>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CatalogPresenter)
                            .intake(req)
                            .handle(|dto| async move { module.pgpool().search_books(dto).await })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .post(
                |State(module): State<AppModule>, Json(req): Json<CreateBookRequest>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CreatedPresenter)
                            .intake(req)
                            .handle(|dto| async move { module.pgpool().create_book(dto).await })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            ),
        )
        .route(
            "/books/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CatalogPresenter)
                            .intake(GetBookRequest::new(id))
                            .handle(|dto| async move { module.pgpool().get_book(dto).await })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateBookRequest>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CatalogPresenter)
                            .intake((id, req))
                            .handle(|dto| async move { module.pgpool().update_book(dto).await })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CatalogPresenter)
                            .intake(CatalogEntry::Book(id))
                            .handle(|entry| async move {
                                module.pgpool().delete_book(entry.into()).await
                            })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            ),
        )
        .route(
            "/customers",
            get(|State(module): State<AppModule>| async move {
                with_deadline(|_| async move {
                    Controller::new(CatalogTransformer, CatalogPresenter)
                        .intake(())
                        .handle(|()| async move { module.pgpool().list_customers().await })
                        .await
                        .map_err(ErrorStatus::from)
                })
                .await
            })
            .post(
                |State(module): State<AppModule>, Json(req): Json<CreateCustomerRequest>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CreatedPresenter)
                            .intake(req)
                            .handle(|dto| async move { module.pgpool().create_customer(dto).await })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            ),
        )
        .route(
            "/customers/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CatalogPresenter)
                            .intake(GetCustomerRequest::new(id))
                            .handle(|dto| async move { module.pgpool().get_customer(dto).await })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateCustomerRequest>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CatalogPresenter)
                            .intake((id, req))
                            .handle(|dto| async move { module.pgpool().update_customer(dto).await })
                            .await
                            .map_err(ErrorStatus::from)
                    })
                    .await
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    with_deadline(|_| async move {
                        Controller::new(CatalogTransformer, CatalogPresenter)
                            .intake(CatalogEntry::Customer(id))
                            .handle(|entry| async move {
                                module.pgpool().delete_customer(entry.into()).await
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
