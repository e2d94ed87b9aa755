use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::entity::TransferEvent;

const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Explorer returned HTTP status {0}")]
    Status(u16),

    #[error("Explorer reported an error: {0}")]
    Upstream(String),

    #[error("Malformed explorer response: {0}")]
    Malformed(String),
}

/// Source of BEP-20 transfer events for a wallet, newest first.
#[async_trait]
pub trait TransferFeed: Send + Sync {
    async fn fetch_transfers(&self, wallet_address: &str) -> Result<Vec<TransferEvent>, FeedError>;
}

#[derive(Deserialize)]
struct ExplorerResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransfer {
    hash: String,
    #[serde(default)]
    from: String,
    to: String,
    token_symbol: String,
    contract_address: String,
    value: String,
    token_decimal: String,
    time_stamp: String,
}

impl RawTransfer {
    fn into_event(self) -> Option<TransferEvent> {
        let token_decimals = self.token_decimal.parse::<u32>().ok()?;
        let timestamp = self.time_stamp.parse::<i64>().ok()?;

        Some(TransferEvent {
            tx_hash: self.hash,
            from_address: self.from,
            to_address: self.to,
            token_symbol: self.token_symbol,
            token_contract_address: self.contract_address,
            raw_value: self.value,
            token_decimals,
            timestamp,
        })
    }
}

/// Parse a BscScan `tokentx` response body.
///
/// `status == "0"` with the "No transactions found" message is an empty feed;
/// any other `"0"` status is an upstream error. Rows that cannot be parsed are
/// skipped.
pub fn parse_transfer_feed(body: &str) -> Result<Vec<TransferEvent>, FeedError> {
    let response: ExplorerResponse =
        serde_json::from_str(body).map_err(|e| FeedError::Malformed(e.to_string()))?;

    if response.status != "1" {
        if response.message.starts_with(NO_TRANSACTIONS_MESSAGE) {
            return Ok(Vec::new());
        }

        // On errors the explorer puts the reason in `result` as a string
        let reason = match response.result.as_str() {
            Some(detail) if !detail.is_empty() => format!("{}: {}", response.message, detail),
            _ => response.message,
        };
        return Err(FeedError::Upstream(reason));
    }

    let rows = match response.result {
        serde_json::Value::Array(rows) => rows,
        other => {
            return Err(FeedError::Malformed(format!(
                "expected a list of transfers, got {}",
                other
            )))
        }
    };

    let mut events = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::from_value::<RawTransfer>(row) {
            Ok(raw) => {
                let hash = raw.hash.clone();
                match raw.into_event() {
                    Some(event) => events.push(event),
                    None => warn!("Skipping transfer {} with unparseable fields", hash),
                }
            }
            Err(e) => warn!("Skipping malformed transfer row: {}", e),
        }
    }

    Ok(events)
}

/// BscScan account API client.
pub struct BscScanClient {
    http_client: Client,
    api_url: String,
    api_key: String,
}

impl BscScanClient {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl TransferFeed for BscScanClient {
    async fn fetch_transfers(&self, wallet_address: &str) -> Result<Vec<TransferEvent>, FeedError> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("module", "account"),
                ("action", "tokentx"),
                ("address", wallet_address),
                ("startblock", "0"),
                ("endblock", "99999999"),
                ("sort", "desc"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let events = parse_transfer_feed(&body)?;
        debug!(
            "Fetched {} transfers for wallet {}",
            events.len(),
            wallet_address
        );

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "status": "1",
        "message": "OK",
        "result": [
            {
                "blockNumber": "35000001",
                "timeStamp": "1700000100",
                "hash": "0xbbb",
                "from": "0x1111111111111111111111111111111111111111",
                "contractAddress": "0x0e09fabb73bd3ade0a17ecc321fd13a19e81ce82",
                "to": "0x2222222222222222222222222222222222222222",
                "value": "2000000000000000000",
                "tokenName": "PancakeSwap Token",
                "tokenSymbol": "Cake",
                "tokenDecimal": "18"
            },
            {
                "timeStamp": "1700000000",
                "hash": "0xaaa",
                "from": "0x2222222222222222222222222222222222222222",
                "contractAddress": "0x55d398326f99059ff775485246999027b3197955",
                "to": "0x3333333333333333333333333333333333333333",
                "value": "1000000",
                "tokenSymbol": "USDT",
                "tokenDecimal": "6"
            }
        ]
    }"#;

    #[test]
    fn parses_transfer_rows_in_feed_order() {
        let events = parse_transfer_feed(FEED).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tx_hash, "0xbbb");
        assert_eq!(events[0].token_symbol, "Cake");
        assert_eq!(events[0].token_decimals, 18);
        assert_eq!(events[0].timestamp, 1_700_000_100);
        assert_eq!(events[1].tx_hash, "0xaaa");
        assert_eq!(events[1].raw_value, "1000000");
    }

    #[test]
    fn no_transactions_is_an_empty_feed() {
        let body = r#"{"status":"0","message":"No transactions found","result":[]}"#;
        assert!(parse_transfer_feed(body).unwrap().is_empty());
    }

    #[test]
    fn status_zero_with_reason_is_an_upstream_error() {
        let body = r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#;
        match parse_transfer_feed(body) {
            Err(FeedError::Upstream(reason)) => assert!(reason.contains("Invalid API Key")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn garbage_body_is_malformed() {
        assert!(matches!(
            parse_transfer_feed("<html>rate limited</html>"),
            Err(FeedError::Malformed(_))
        ));
        assert!(matches!(
            parse_transfer_feed(r#"{"status":"1","message":"OK","result":"oops"}"#),
            Err(FeedError::Malformed(_))
        ));
    }

    #[test]
    fn bad_rows_are_skipped() {
        let body = r#"{"status":"1","message":"OK","result":[
            {"hash":"0x1","to":"0x2","tokenSymbol":"X","contractAddress":"0x3","value":"1","tokenDecimal":"abc","timeStamp":"1"},
            {"hash":"0x4"},
            {"hash":"0x5","to":"0x2","tokenSymbol":"Y","contractAddress":"0x3","value":"1","tokenDecimal":"0","timeStamp":"9"}
        ]}"#;
        let events = parse_transfer_feed(body).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tx_hash, "0x5");
    }
}
