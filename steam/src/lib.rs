//! Tracks Steam Community Market prices for a list of items and posts Discord alerts
//! when a price moves past a threshold.
//!
//! A single pass is driven by [`Tracker::run`]. Prices are recorded in an append-only
//! `history.csv` and the last seen price per item is cached in `prices.json`.
mod alert;
mod cache;
mod config;
mod date;
mod discord;
mod endpoint;
mod error;
mod history;
mod http;
mod items;
mod price;
mod progress_bar;
mod retry;
mod tracker;

pub use alert::{evaluate, Alert, AlertKind, Direction, Evaluation, PriceChange};
pub use cache::{CacheEntry, PriceCache};
pub use config::{Config, Currency};
pub use date::DateTime;
pub use discord::{Notifier, Webhook};
pub use error::Error;
pub use history::{History, Record};
pub use http::{HttpClient, InventoryResponse, PriceOverview, CS2_APP_ID};
pub use items::{dedupe, read_items_file};
pub use price::parse_price;
pub use retry::{Backoff, Failure, RetryPolicy};
pub use tracker::{Summary, Tracker};

pub type Result<T> = std::result::Result<T, Error>;

use env_logger::{Builder, Env};

/// Sets up the environment for the application.
///
/// Loads environment variables from a `.env` file if present and initializes the
/// logger with a default filter level of "info".
///
/// # Examples
///
/// ```no_run
/// steam::setup_env();
/// // The logger is now initialized and environment variables are loaded
/// ```
pub fn setup_env() {
    dotenvy::dotenv().ok();
    Builder::from_env(Env::default().default_filter_or("info")).init();
}
