use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::collections::HashMap;

const BNB_COINGECKO_ID: &str = "binancecoin";

#[async_trait]
pub trait PriceService: Send + Sync {
    /// Current BNB price in USD
    async fn get_bnb_price(&self) -> Result<f64>;
}

/// Price service backed by the CoinGecko simple price API
pub struct CoinGeckoPriceService {
    http_client: Client,
    api_url: String,
}

impl CoinGeckoPriceService {
    pub fn new(api_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PriceService for CoinGeckoPriceService {
    async fn get_bnb_price(&self) -> Result<f64> {
        let url = format!("{}/simple/price", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("ids", BNB_COINGECKO_ID), ("vs_currencies", "usd")])
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("CoinGecko API error: status {}", response.status()));
        }

        let prices: HashMap<String, HashMap<String, f64>> = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse prices response: {}", e))?;

        let price = prices
            .get(BNB_COINGECKO_ID)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| anyhow!("CoinGecko response has no BNB/USD quote"))?;
        debug!("BNB price: ${}", price);

        Ok(price)
    }
}
