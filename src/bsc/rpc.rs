use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

const WEI_DECIMALS: u32 = 18;

#[derive(Deserialize)]
struct RpcError {
    message: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[async_trait]
pub trait BalanceService: Send + Sync {
    /// Native BNB balance of `wallet_address`, in BNB
    async fn get_bnb_balance(&self, wallet_address: &str) -> Result<f64>;
}

/// Minimal BSC JSON-RPC client for native balance lookups
pub struct BscRpcClient {
    http_client: Client,
    rpc_url: String,
}

impl BscRpcClient {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            rpc_url: rpc_url.to_string(),
        }
    }
}

#[async_trait]
impl BalanceService for BscRpcClient {
    async fn get_bnb_balance(&self, wallet_address: &str) -> Result<f64> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_getBalance",
            "params": [wallet_address, "latest"],
        });

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("BSC RPC request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("BSC RPC returned status {}", response.status()));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse BSC RPC response: {}", e))?;

        if let Some(error) = body.error {
            return Err(anyhow!("BSC RPC error: {}", error.message));
        }

        let wei_hex = body
            .result
            .ok_or_else(|| anyhow!("BSC RPC response has no result"))?;
        debug!("eth_getBalance({}) = {}", wallet_address, wei_hex);

        wei_hex_to_bnb(&wei_hex)
    }
}

pub fn wei_hex_to_bnb(wei_hex: &str) -> Result<f64> {
    let digits = wei_hex.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(0.0);
    }

    let wei = u128::from_str_radix(digits, 16)
        .map_err(|e| anyhow!("Invalid wei amount {}: {}", wei_hex, e))?;

    match Decimal::try_from_i128_with_scale(wei as i128, WEI_DECIMALS) {
        Ok(bnb) => bnb
            .to_f64()
            .ok_or_else(|| anyhow!("Balance {} out of range", wei_hex)),
        Err(_) => Ok(wei as f64 / 10f64.powi(WEI_DECIMALS as i32)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_wei_hex_to_bnb() {
        // 1.5 BNB
        assert!((wei_hex_to_bnb("0x14d1120d7b160000").unwrap() - 1.5).abs() < 1e-12);
        assert_eq!(wei_hex_to_bnb("0x0").unwrap(), 0.0);
        assert_eq!(wei_hex_to_bnb("0x").unwrap(), 0.0);
    }

    #[test]
    fn rejects_non_hex_balance() {
        assert!(wei_hex_to_bnb("0xzz").is_err());
    }
}
