use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BSCSCAN_API_URL: &str = "https://api.bscscan.com/api";
pub const DEFAULT_WEB3_PROVIDER_URL: &str = "https://bsc-dataseed.binance.org/";
pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/bot_data.db";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Application configuration, read from environment variables (and `.env`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Telegram bot token
    pub telegram_bot_token: String,

    /// BscScan API key used for the token transfer feed
    pub bscscan_api_key: String,

    /// BscScan API endpoint
    pub bscscan_api_url: String,

    /// BSC JSON-RPC endpoint used for native balances
    pub web3_provider_url: String,

    /// CoinGecko API base URL
    pub coingecko_api_url: String,

    /// SQLite database URL
    pub database_url: String,

    pub database_max_connections: u32,

    /// Seconds between two poll cycles of a wallet watch
    pub poll_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bscscan_api_url", DEFAULT_BSCSCAN_API_URL)?
            .set_default("web3_provider_url", DEFAULT_WEB3_PROVIDER_URL)?
            .set_default("coingecko_api_url", DEFAULT_COINGECKO_API_URL)?
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("database_max_connections", 5_i64)?
            .set_default("poll_interval_secs", DEFAULT_POLL_INTERVAL_SECS as i64)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
