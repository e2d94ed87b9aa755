use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub amount: f64,
    pub contract_address: String,
}

/// Latest buy or sell seen in a wallet's transfer history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSummary {
    pub token_symbol: String,
    pub amount: f64,
    pub tx_hash: String,
    pub contract_address: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub wallet_address: String,
    pub bnb_balance: f64,
    pub bnb_price_usd: f64,
    pub tokens: Vec<TokenBalance>,
    pub last_buy: Option<TradeSummary>,
    pub last_sell: Option<TradeSummary>,
}

impl Portfolio {
    pub fn bnb_value_usd(&self) -> f64 {
        self.bnb_balance * self.bnb_price_usd
    }
}
