use anyhow::Result;
use log::{error, warn};
use std::sync::Arc;
use steam::Tracker;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

pub(crate) struct Scheduler {
    /// Held for the duration of a pass so ticks never overlap
    tracker: Arc<Mutex<Tracker>>,
    scheduler: JobScheduler,
}

impl Scheduler {
    pub(crate) async fn new(tracker: Tracker) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self {
            tracker: Arc::new(Mutex::new(tracker)),
            scheduler,
        })
    }

    /// Accepts cron expressions and English schedules such as "every hour".
    pub(crate) async fn schedule_price_checks(&self, schedule: &str) -> Result<()> {
        let tracker = Arc::clone(&self.tracker);

        self.scheduler
            .add(Job::new_async(schedule, move |_uuid, _l| {
                let tracker = Arc::clone(&tracker);
                Box::pin(async move {
                    let Ok(tracker) = tracker.try_lock() else {
                        warn!("Previous price check still running, skipping this one");
                        return;
                    };
                    if let Err(e) = tracker.run().await {
                        error!("Error executing scheduled price check: {e}");
                    }
                })
            })?)
            .await?;

        Ok(())
    }

    pub(crate) async fn start(&self) -> Result<()> {
        self.scheduler.start().await?;
        Ok(())
    }

    pub(crate) async fn shutdown(mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        Ok(())
    }
}
