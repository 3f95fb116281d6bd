use crate::alert::evaluate;
use crate::items::load_items;
use crate::progress_bar::ProgressTracker;
use crate::{
    CacheEntry, Config, DateTime, History, HttpClient, Notifier, PriceCache, Record, Result,
    Webhook,
};
use log::{info, warn};
use tokio::time::sleep;

/// Counts for one pass over the item list
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub checked: usize,
    pub skipped: usize,
    pub failed: usize,
    pub alerts: usize,
}

enum Outcome {
    Skipped,
    Failed,
    Checked { alerts: usize },
}

#[derive(Clone)]
pub struct Tracker {
    config: Config,
    http: HttpClient,
    notifier: Notifier,
    history: History,
}

impl Tracker {
    pub fn new(config: Config) -> Self {
        let client = reqwest::Client::new();
        let notifier = Notifier::new(
            Webhook::new(client.clone(), config.discord_webhook.clone()),
            config
                .discord_webhook_average
                .as_ref()
                .map(|url| Webhook::new(client.clone(), url.clone())),
        );

        Self {
            http: HttpClient::with_client(client, &config),
            history: History::new(config.history_path()),
            notifier,
            config,
        }
    }

    /// Checks every tracked item once.
    ///
    /// Price lookups that fail are logged and counted. Failing to read or write the
    /// history or the price cache aborts the pass.
    pub async fn run(&self) -> Result<Summary> {
        info!("Starting price check");
        let mut cache = PriceCache::load(self.config.price_cache_path());
        let items = load_items(&self.config, &self.http).await?;
        let mut summary = Summary::default();

        if items.is_empty() {
            info!("No items to check");
            return Ok(summary);
        }

        let progress = ProgressTracker::new(items.len() as u64);
        for (idx, item) in items.iter().enumerate() {
            progress.start(item);
            info!("[{}/{}] Processing {item}", idx + 1, items.len());

            match self.process_item(&mut cache, item).await? {
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed => summary.failed += 1,
                Outcome::Checked { alerts } => {
                    summary.checked += 1;
                    summary.alerts += alerts;
                }
            }
            progress.increment();
        }
        progress.finish("Done!".to_string());

        info!(
            "Checked {} items, skipped {}, failed {}, sent {} alerts",
            summary.checked, summary.skipped, summary.failed, summary.alerts
        );
        Ok(summary)
    }

    async fn process_item(&self, cache: &mut PriceCache, item: &str) -> Result<Outcome> {
        let now = DateTime::now();
        let cached = cache.get(item).cloned();

        if let Some(entry) = &cached {
            if entry.is_fresh(now.unix_seconds(), self.config.refresh_interval) {
                let minutes = (now.unix_seconds() - entry.last_update) / 60.0;
                info!("Skipping {item}, updated {minutes:.0} minutes ago");
                return Ok(Outcome::Skipped);
            }
        }

        let fetched = self.http.fetch_price(item).await;
        sleep(self.config.request_delay).await;
        let price = match fetched {
            Ok(price) => price,
            Err(e) => {
                warn!("Price fetch failed for {item}: {e}");
                return Ok(Outcome::Failed);
            }
        };
        let symbol = &self.config.currency.symbol;
        info!("Current price of {item}: {symbol}{price:.2}");

        self.history.append(&Record {
            timestamp: now,
            item: item.to_string(),
            price,
        })?;
        let since = DateTime(*now - self.config.average_window());
        let window_average = self.history.average_since(item, since)?;

        let evaluation = evaluate(&self.config, item, cached.as_ref(), price, window_average);
        info!(
            "Change {:.2}% (old {symbol}{:.2}), {}-hour avg {symbol}{:.2}",
            evaluation.change.percent(),
            evaluation.change.reference,
            self.config.average_window_hours,
            evaluation.window_average,
        );

        let mut sent = 0;
        for alert in &evaluation.alerts {
            if self.notifier.notify(alert).await {
                sent += 1;
            }
        }

        cache.insert(
            item,
            CacheEntry {
                price,
                last_update: now.unix_seconds(),
                window_average: Some(evaluation.window_average),
            },
        );
        cache.save()?;

        Ok(Outcome::Checked { alerts: sent })
    }
}
