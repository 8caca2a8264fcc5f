use std::time::Duration;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use clap::Parser;
use tokio::{signal::ctrl_c, time::sleep};

use crate::{cli::analyze::AnalyzeArgs, prelude::*};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(flatten)]
    analyze: AnalyzeArgs,

    /// Daily run time in UTC.
    #[clap(long, env = "RUN_AT", default_value = "04:00:00")]
    run_at: NaiveTime,
}

impl WatchArgs {
    pub async fn run(self) -> Result {
        loop {
            if let Err(error) = self.analyze.run() {
                error!("the run has failed: {error:#}");
            }
            let duration = until_next_run(Utc::now(), self.run_at);
            info!(duration = %humantime::format_duration(duration), "sleeping…");
            tokio::select! {
                () = sleep(duration) => {}
                result = ctrl_c() => {
                    result.context("failed to listen for Ctrl+C")?;
                    info!("interrupted");
                    return Ok(());
                }
            }
        }
    }
}

/// Time left until the next occurrence of the daily run time.
fn until_next_run(now: DateTime<Utc>, run_at: NaiveTime) -> Duration {
    let today = now.date_naive().and_time(run_at).and_utc();
    let next = if today > now { today } else { today + TimeDelta::days(1) };
    (next - now).to_std().unwrap_or_default()
}
