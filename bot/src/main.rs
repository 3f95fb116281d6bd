mod scheduler;

use anyhow::Result;
use log::info;
use scheduler::Scheduler;
use std::env;
use steam::{Config, Tracker};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    steam::setup_env();

    let tracker = Tracker::new(Config::from_env()?);

    match env::var("SCHEDULE").ok().filter(|s| !s.trim().is_empty()) {
        Some(schedule) => run_scheduled(tracker, &schedule).await,
        None => {
            tracker.run().await?;
            Ok(())
        }
    }
}

async fn run_scheduled(tracker: Tracker, schedule: &str) -> Result<()> {
    let scheduler = Scheduler::new(tracker).await?;
    scheduler.schedule_price_checks(schedule).await?;
    scheduler.start().await?;
    info!("Checking prices on schedule {schedule:?}, press Ctrl-C to stop");

    signal::ctrl_c().await?;
    scheduler.shutdown().await
}
