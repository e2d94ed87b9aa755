use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferDirection {
    Incoming,
    Outgoing,
}

impl TransferDirection {
    pub fn label(&self) -> &'static str {
        match self {
            TransferDirection::Incoming => "Buy",
            TransferDirection::Outgoing => "Sell",
        }
    }
}

/// One BEP-20 transfer as reported by the explorer feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub tx_hash: String,
    pub from_address: String,
    pub to_address: String,
    pub token_symbol: String,
    pub token_contract_address: String,
    pub raw_value: String,
    pub token_decimals: u32,
    pub timestamp: i64,
}

impl TransferEvent {
    pub fn direction(&self, wallet_address: &str) -> TransferDirection {
        if self.to_address.eq_ignore_ascii_case(wallet_address) {
            TransferDirection::Incoming
        } else {
            TransferDirection::Outgoing
        }
    }

    /// `raw_value / 10^token_decimals`.
    ///
    /// Exact while the raw value fits a 96-bit decimal mantissa, approximated
    /// with floating point beyond that.
    pub fn normalized_amount(&self) -> f64 {
        if let Ok(mut value) = Decimal::from_str(&self.raw_value) {
            if self.token_decimals <= 28 && value.set_scale(self.token_decimals).is_ok() {
                if let Some(amount) = value.to_f64() {
                    return amount;
                }
            }
        }

        self.raw_value
            .parse::<f64>()
            .map(|raw| raw / 10f64.powi(self.token_decimals as i32))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(to: &str, value: &str, decimals: u32) -> TransferEvent {
        TransferEvent {
            tx_hash: "0xhash".to_string(),
            from_address: "0x2222222222222222222222222222222222222222".to_string(),
            to_address: to.to_string(),
            token_symbol: "CAKE".to_string(),
            token_contract_address: "0x0e09fabb73bd3ade0a17ecc321fd13a19e81ce82".to_string(),
            raw_value: value.to_string(),
            token_decimals: decimals,
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn direction_is_case_insensitive() {
        let wallet = "0xAAAAaaaaAAAAaaaaAAAAaaaaAAAAaaaaAAAAaaaa";
        let incoming = event("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "1", 0);
        assert_eq!(incoming.direction(wallet), TransferDirection::Incoming);
        assert_eq!(incoming.direction(wallet).label(), "Buy");

        let outgoing = event("0x3333333333333333333333333333333333333333", "1", 0);
        assert_eq!(outgoing.direction(wallet), TransferDirection::Outgoing);
        assert_eq!(outgoing.direction(wallet).label(), "Sell");
    }

    #[test]
    fn normalized_amount_applies_decimals() {
        let e = event("0x", "1500000000000000000", 18);
        assert!((e.normalized_amount() - 1.5).abs() < 1e-12);

        let e = event("0x", "2500000", 6);
        assert!((e.normalized_amount() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn normalized_amount_handles_values_beyond_decimal_range() {
        // 10^33 does not fit a 96-bit mantissa
        let e = event("0x", "1000000000000000000000000000000000", 18);
        assert!((e.normalized_amount() - 1e15).abs() < 1.0);
    }

    #[test]
    fn normalized_amount_of_garbage_is_zero() {
        let e = event("0x", "not-a-number", 18);
        assert_eq!(e.normalized_amount(), 0.0);
    }
}
