use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a watch: one chat following one wallet.
///
/// Addresses are compared case-insensitively, so the key always holds the
/// lower-cased form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchKey {
    pub chat_id: i64,
    pub wallet_address: String,
}

impl WatchKey {
    pub fn new(chat_id: i64, wallet_address: &str) -> Self {
        Self {
            chat_id,
            wallet_address: wallet_address.trim().to_lowercase(),
        }
    }
}

impl std::fmt::Display for WatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.wallet_address, self.chat_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchedWallet {
    pub chat_id: i64,
    pub wallet_address: String,
    pub custom_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WatchedWallet {
    pub fn key(&self) -> WatchKey {
        WatchKey::new(self.chat_id, &self.wallet_address)
    }

    // Custom name if one was set, the address otherwise
    pub fn display_name(&self) -> &str {
        match self.custom_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.wallet_address,
        }
    }
}
