use crate::endpoint::Endpoint;
use crate::price::parse_price;
use crate::retry::{Failure, RetryPolicy};
use crate::{dedupe, Config, Error, Result};
use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

pub const CS2_APP_ID: u32 = 730;
const GET_TIMEOUT: Duration = Duration::from_secs(30);
const INVENTORY_COUNT: u32 = 2000;

#[derive(Debug, Deserialize)]
pub struct PriceOverview {
    #[serde(default)]
    pub success: bool,
    pub lowest_price: Option<String>,
    pub median_price: Option<String>,
    pub volume: Option<String>,
}

impl PriceOverview {
    /// The lowest listing, or the median sale price when nothing is listed
    pub fn price(&self, item: &str) -> Result<f64> {
        match self.lowest_price.as_deref().or(self.median_price.as_deref()) {
            Some(raw) if !raw.trim().is_empty() => parse_price(raw),
            _ => Err(Error::NoPrice(item.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Description {
    pub market_hash_name: Option<String>,
    #[serde(default)]
    pub marketable: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct InventoryResponse {
    #[serde(default)]
    pub descriptions: Vec<Description>,
    pub total_inventory_count: Option<u32>,
}

impl InventoryResponse {
    /// Names of marketable items, in inventory order without duplicates
    pub fn marketable_names(self) -> Vec<String> {
        dedupe(
            self.descriptions
                .into_iter()
                .filter(|d| d.marketable == 1)
                .filter_map(|d| d.market_hash_name),
        )
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    app_id: u32,
    currency: u32,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.steam_base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id,
            currency: config.currency.id,
            retry: RetryPolicy::new(config.max_retries),
        }
    }

    fn url(&self, endpoint: Endpoint, suffix: &str, params: &[(&str, &str)]) -> Result<Url> {
        Ok(Url::parse_with_params(
            &format!("{}{endpoint}{suffix}", self.base_url),
            params,
        )?)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {url}");
        let mut backoff = self.retry.backoff();

        loop {
            let failure = match self.client.get(url.clone()).timeout(GET_TIMEOUT).send().await {
                Ok(response) if response.status().is_success() => {
                    let text = response.text().await?;
                    return serde_json::from_str(&text)
                        .map_err(|e| Error::Deserialize(format!("{e}: {text}")));
                }
                Ok(response) => {
                    let status = response.status();
                    match Failure::from_status(status) {
                        Some(failure) => failure,
                        None => return Err(Error::Response(status, url.to_string())),
                    }
                }
                Err(e) => {
                    warn!("Request to {url} failed: {e}");
                    Failure::Transport
                }
            };

            match backoff.next(failure) {
                Some(wait) => {
                    warn!(
                        "{failure:?} on attempt {}/{}, retrying in {wait:?}",
                        backoff.attempt(),
                        self.retry.max_attempts
                    );
                    sleep(wait).await;
                }
                None => return Err(Error::RetriesExhausted(url.to_string(), backoff.attempt())),
            }
        }
    }

    pub async fn fetch_price_overview(&self, item: &str) -> Result<PriceOverview> {
        let app_id = self.app_id.to_string();
        let currency = self.currency.to_string();
        let url = self.url(
            Endpoint::PriceOverview,
            "",
            &[
                ("appid", app_id.as_str()),
                ("currency", currency.as_str()),
                ("market_hash_name", item),
            ],
        )?;
        self.get(url).await
    }

    pub async fn fetch_price(&self, item: &str) -> Result<f64> {
        self.fetch_price_overview(item).await?.price(item)
    }

    pub async fn fetch_inventory(&self, steam_id: &str) -> Result<InventoryResponse> {
        let count = INVENTORY_COUNT.to_string();
        let url = self.url(
            Endpoint::Inventory,
            &format!("/{steam_id}/{}/2", self.app_id),
            &[("l", "english"), ("count", count.as_str())],
        )?;
        self.get(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use serde_json::json;

    fn client() -> HttpClient {
        let config = Config::from_lookup(|key| match key {
            "DISCORD_WEBHOOK" => Some("https://discord.test/hook".to_string()),
            "STEAM_COMMUNITY_URL" => Some("https://steam.test/".to_string()),
            _ => None,
        })
        .unwrap();
        HttpClient::new(&config)
    }

    #[test]
    fn test_price_overview_url_encodes_name() {
        let client = client();
        let url = client
            .url(
                Endpoint::PriceOverview,
                "",
                &[("market_hash_name", "AK-47 | Redline (Field-Tested)")],
            )
            .unwrap();

        assert_eq!(url.path(), "/market/priceoverview/");
        let (_, name) = url.query_pairs().next().unwrap();
        assert_eq!(name, "AK-47 | Redline (Field-Tested)");
        assert!(!url.as_str().contains('|'));
    }

    #[test]
    fn test_inventory_url() {
        let client = client();
        let url = client
            .url(Endpoint::Inventory, "/76561198000000000/730/2", &[("l", "english")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://steam.test/inventory/76561198000000000/730/2?l=english"
        );
    }

    #[test]
    fn test_price_falls_back_to_median() {
        let overview: PriceOverview = serde_json::from_value(json!({
            "success": true,
            "median_price": "₹ 1,020.00",
            "volume": "3"
        }))
        .unwrap();
        assert_eq!(overview.price("Case").unwrap(), 1020.0);

        let overview: PriceOverview = serde_json::from_value(json!({
            "success": true,
            "lowest_price": "₹ 990.50",
            "median_price": "₹ 1,020.00"
        }))
        .unwrap();
        assert_eq!(overview.price("Case").unwrap(), 990.5);
    }

    #[test]
    fn test_missing_price() {
        let overview: PriceOverview = serde_json::from_value(json!({"success": false})).unwrap();
        assert!(matches!(overview.price("Case"), Err(Error::NoPrice(item)) if item == "Case"));
    }

    #[test]
    fn test_marketable_names() {
        let inventory: InventoryResponse = serde_json::from_value(json!({
            "assets": [],
            "descriptions": [
                {"market_hash_name": "Revolution Case", "marketable": 1},
                {"market_hash_name": "Service Medal", "marketable": 0},
                {"market_hash_name": "Revolution Case", "marketable": 1},
                {"market_hash_name": "Sticker | Cloud9", "marketable": 1},
                {"marketable": 1}
            ],
            "total_inventory_count": 5
        }))
        .unwrap();

        assert_eq!(
            inventory.marketable_names(),
            vec!["Revolution Case", "Sticker | Cloud9"]
        );
    }

    #[test]
    fn test_empty_inventory() {
        let inventory: InventoryResponse =
            serde_json::from_value(json!({"total_inventory_count": 0, "success": 1})).unwrap();
        assert!(inventory.marketable_names().is_empty());
    }
}
