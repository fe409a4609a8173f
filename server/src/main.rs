use crate::error::StackTrace;
use crate::handler::AppModule;
use crate::route::{CatalogRouter, OrderRouter, ReportRouter};
use application::schedule::{run_daily_sales_report, SystemClock};
use error_stack::ResultExt;
use kernel::KernelError;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

mod controller;
mod error;
mod handler;
mod route;

#[tokio::main]
async fn main() -> Result<(), StackTrace> {
    let appender = tracing_appender::rolling::daily(std::path::Path::new("./logs/"), "debug.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::EnvFilter::new(
                    std::env::var("RUST_LOG").unwrap_or_else(|_| {
                        "application=debug,driver=debug,server=debug,tower_http=debug,hyper=debug,sqlx=info".into()
                    }),
                ))
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .init();

    let app = AppModule::new().await?;
    let shutdown = CancellationToken::new();

    let report_job = if driver::config::report_job_enabled()? {
        let module = app.pgpool().clone();
        let token = shutdown.child_token();
        Some(tokio::spawn(run_daily_sales_report(
            module,
            SystemClock,
            token,
        )))
    } else {
        tracing::info!("Daily sales report job disabled");
        None
    };

    let router = axum::Router::new()
        .route_order()
        .route_report()
        .route_catalog()
        .layer(CorsLayer::new())
        .with_state(app);

    let port = driver::config::server_port()?;
    let bind = SocketAddr::from(([0, 0, 0, 0], port));
    let tcp = TcpListener::bind(bind)
        .await
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("Failed to listen tcp on {bind}"))?;
    tracing::info!(%bind, "Listening");

    let signal = shutdown.clone();
    axum::serve(tcp, router.into_make_service())
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {e}");
            }
            signal.cancel();
        })
        .await
        .change_context_lazy(|| KernelError::Internal)?;

    shutdown.cancel();
    if let Some(job) = report_job {
        if let Err(e) = job.await {
            tracing::error!("Sales report job ended abnormally: {e}");
        }
    }

    Ok(())
}
