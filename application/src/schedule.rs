use std::time::Duration;

use time::{OffsetDateTime, Time, UtcOffset};
use tokio_util::sync::CancellationToken;

use kernel::prelude::entity::TimeWindow;

use crate::service::GenerateSalesReportService;
use crate::transfer::GenerateSalesReportDto;

pub static REPORT_RUN_TIMEOUT: Duration = Duration::from_secs(30);

pub trait Clock: 'static + Sync + Send {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// First UTC midnight strictly after `now`.
pub fn next_midnight(now: OffsetDateTime) -> OffsetDateTime {
    now.to_offset(UtcOffset::UTC).replace_time(Time::MIDNIGHT) + time::Duration::DAY
}

/// A failed or timed out run is logged and the schedule carries on.
#[tracing::instrument(skip_all, name = "sales_report_job")]
pub async fn run_daily_sales_report<M, C>(module: M, clock: C, token: CancellationToken)
where
    M: GenerateSalesReportService,
    C: Clock,
{
    let mut last: Option<OffsetDateTime> = None;
    loop {
        let now = clock.now();
        let mut boundary = next_midnight(now);
        if let Some(last) = last {
            if boundary <= last {
                boundary = last + time::Duration::DAY;
            }
        }
        let delay = Duration::try_from(boundary - now).unwrap_or(Duration::ZERO);
        tracing::debug!(next_run = %boundary, "Waiting for next sales report run");

        tokio::select! {
            _ = token.cancelled() => {
                tracing::info!("Sales report job stopped");
                return;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        last = Some(boundary);
        let window = TimeWindow::day_before(boundary);
        let dto = GenerateSalesReportDto {
            from: *window.from(),
            to: *window.to(),
        };
        let run_token = token.child_token();
        match tokio::time::timeout(
            REPORT_RUN_TIMEOUT,
            module.generate_sales_report(&run_token, dto),
        )
        .await
        {
            Ok(Ok(report)) => tracing::info!(
                from = %report.from,
                to = %report.to,
                orders = report.total_orders,
                "Scheduled sales report finished"
            ),
            Ok(Err(error)) => tracing::error!(?error, "Scheduled sales report failed"),
            Err(_) => {
                run_token.cancel();
                tracing::error!(
                    timeout = ?REPORT_RUN_TIMEOUT,
                    "Scheduled sales report timed out"
                )
            }
        }
    }
}
