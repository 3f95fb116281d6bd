use crate::http::CS2_APP_ID;
use crate::{Error, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const PRICE_CACHE_FILE: &str = "prices.json";
const HISTORY_FILE: &str = "history.csv";

/// Steam currency id 24 is the Indian rupee
const DEFAULT_CURRENCY: u32 = 24;
const DEFAULT_ALERT_THRESHOLD: f64 = 0.10;
const DEFAULT_AVERAGE_ALERT_THRESHOLD: f64 = 0.05;
const DEFAULT_AVERAGE_WINDOW_HOURS: u64 = 3;
const DEFAULT_REFRESH_INTERVAL_MINUTES: u64 = 60;
const DEFAULT_REQUEST_DELAY_MS: u64 = 1200;
const DEFAULT_MAX_RETRIES: u32 = 6;
const MAX_AVERAGE_WINDOW_HOURS: u64 = 24 * 365;
const MAX_REFRESH_INTERVAL_MINUTES: u64 = 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct Currency {
    /// Steam's numeric currency id
    pub id: u32,
    pub symbol: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_webhook: String,
    pub discord_webhook_average: Option<String>,
    pub steam_id: Option<String>,
    pub app_id: u32,
    pub currency: Currency,
    pub steam_base_url: String,
    pub items_file: PathBuf,
    pub data_dir: PathBuf,
    pub alert_threshold: f64,
    pub average_alert_threshold: f64,
    pub average_window_hours: u64,
    pub refresh_interval: Duration,
    pub request_delay: Duration,
    pub max_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let discord_webhook = get("DISCORD_WEBHOOK")
            .ok_or_else(|| Error::Config("DISCORD_WEBHOOK is not set".to_string()))?;

        Ok(Self {
            discord_webhook,
            discord_webhook_average: get("DISCORD_WEBHOOK_3HR"),
            steam_id: get("STEAM_ID64"),
            app_id: parse_or(&get, "STEAM_APP_ID", CS2_APP_ID)?,
            currency: Currency {
                id: parse_or(&get, "STEAM_CURRENCY", DEFAULT_CURRENCY)?,
                symbol: get("CURRENCY_SYMBOL").unwrap_or_else(|| "₹".to_string()),
                code: get("CURRENCY_CODE").unwrap_or_else(|| "INR".to_string()),
            },
            steam_base_url: get("STEAM_COMMUNITY_URL")
                .unwrap_or_else(|| "https://steamcommunity.com".to_string()),
            items_file: get("ITEMS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("items.txt")),
            data_dir: get("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".data")),
            alert_threshold: parse_or(&get, "ALERT_THRESHOLD", DEFAULT_ALERT_THRESHOLD)?,
            average_alert_threshold: parse_or(
                &get,
                "AVERAGE_ALERT_THRESHOLD",
                DEFAULT_AVERAGE_ALERT_THRESHOLD,
            )?,
            average_window_hours: at_most(
                "AVERAGE_WINDOW_HOURS",
                parse_or(&get, "AVERAGE_WINDOW_HOURS", DEFAULT_AVERAGE_WINDOW_HOURS)?,
                MAX_AVERAGE_WINDOW_HOURS,
            )?,
            refresh_interval: Duration::from_secs(
                60 * at_most(
                    "REFRESH_INTERVAL_MINUTES",
                    parse_or(
                        &get,
                        "REFRESH_INTERVAL_MINUTES",
                        DEFAULT_REFRESH_INTERVAL_MINUTES,
                    )?,
                    MAX_REFRESH_INTERVAL_MINUTES,
                )?,
            ),
            request_delay: Duration::from_millis(parse_or(
                &get,
                "REQUEST_DELAY_MS",
                DEFAULT_REQUEST_DELAY_MS,
            )?),
            max_retries: parse_or(&get, "MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
        })
    }

    pub fn price_cache_path(&self) -> PathBuf {
        self.data_dir.join(PRICE_CACHE_FILE)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    pub fn average_window(&self) -> time::Duration {
        time::Duration::hours(self.average_window_hours as i64)
    }
}

fn parse_or<G, T>(get: &G, key: &str, default: T) -> Result<T>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{key} has an invalid value: {value:?}"))),
        None => Ok(default),
    }
}

fn at_most(key: &str, value: u64, max: u64) -> Result<u64> {
    if value > max {
        return Err(Error::Config(format!("{key} must be at most {max}, got {value}")));
    }
    Ok(value)
}
