//! In-memory fakes for the watch store, transfer feed and notifier.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Error as SqlxError;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::bsc::{FeedError, TransferFeed};
use crate::entity::{TransferEvent, WatchKey, WatchedWallet};
use crate::services::notifier::Notifier;
use crate::services::watch_store::WatchStore;

/// Builds a transfer of 1.0 TEST token.
pub fn transfer(hash: &str, timestamp: i64, from: &str, to: &str) -> TransferEvent {
    TransferEvent {
        tx_hash: hash.to_string(),
        from_address: from.to_string(),
        to_address: to.to_string(),
        token_symbol: "TEST".to_string(),
        token_contract_address: "0x0e09fabb73bd3ade0a17ecc321fd13a19e81ce82".to_string(),
        raw_value: "1000000000000000000".to_string(),
        token_decimals: 18,
        timestamp,
    }
}

/// A `WatchStore` kept in process memory, with switchable failures.
#[derive(Default)]
pub struct MemoryWatchStore {
    wallets: Mutex<HashMap<WatchKey, WatchedWallet>>,
    seen: Mutex<HashMap<WatchKey, HashSet<String>>>,
    failing: AtomicBool,
    writes: AtomicUsize,
    upsert_delay: Mutex<Option<Duration>>,
}

impl MemoryWatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every `upsert_wallet` sleep before writing.
    pub fn set_upsert_delay(&self, delay: Duration) {
        *self.upsert_delay.lock().unwrap() = Some(delay);
    }

    /// Number of successful mutating calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), SqlxError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(SqlxError::PoolTimedOut)
        } else {
            Ok(())
        }
    }

    fn wrote(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl WatchStore for MemoryWatchStore {
    async fn upsert_wallet(
        &self,
        key: &WatchKey,
        custom_name: Option<&str>,
    ) -> Result<(), SqlxError> {
        let delay = *self.upsert_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.check()?;
        let mut wallets = self.wallets.lock().unwrap();
        let wallet = wallets.entry(key.clone()).or_insert_with(|| WatchedWallet {
            chat_id: key.chat_id,
            wallet_address: key.wallet_address.clone(),
            custom_name: None,
            created_at: Utc::now(),
        });
        if let Some(name) = custom_name {
            wallet.custom_name = Some(name.to_string());
        }
        self.wrote();
        Ok(())
    }

    async fn remove_wallet(&self, key: &WatchKey) -> Result<bool, SqlxError> {
        self.check()?;
        let removed = self.wallets.lock().unwrap().remove(key).is_some();
        if removed {
            self.wrote();
        }
        Ok(removed)
    }

    async fn get_wallet(&self, key: &WatchKey) -> Result<Option<WatchedWallet>, SqlxError> {
        self.check()?;
        Ok(self.wallets.lock().unwrap().get(key).cloned())
    }

    async fn list_wallets(&self, chat_id: i64) -> Result<Vec<WatchedWallet>, SqlxError> {
        self.check()?;
        let mut wallets: Vec<WatchedWallet> = self
            .wallets
            .lock()
            .unwrap()
            .values()
            .filter(|wallet| wallet.chat_id == chat_id)
            .cloned()
            .collect();
        wallets.sort_by(|a, b| a.wallet_address.cmp(&b.wallet_address));
        Ok(wallets)
    }

    async fn list_chats_with_wallets(&self) -> Result<Vec<i64>, SqlxError> {
        self.check()?;
        let mut chats: Vec<i64> = self
            .wallets
            .lock()
            .unwrap()
            .keys()
            .map(|key| key.chat_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        chats.sort_unstable();
        Ok(chats)
    }

    async fn rename_wallet(&self, key: &WatchKey, new_name: &str) -> Result<bool, SqlxError> {
        self.check()?;
        match self.wallets.lock().unwrap().get_mut(key) {
            Some(wallet) => {
                wallet.custom_name = Some(new_name.to_string());
                self.wrote();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_seen(&self, key: &WatchKey, tx_hash: &str) -> Result<(), SqlxError> {
        self.check()?;
        self.seen
            .lock()
            .unwrap()
            .entry(key.clone())
            .or_default()
            .insert(tx_hash.to_string());
        self.wrote();
        Ok(())
    }

    async fn seen_hashes(&self, key: &WatchKey) -> Result<HashSet<String>, SqlxError> {
        self.check()?;
        Ok(self
            .seen
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn purge_seen(&self, key: &WatchKey) -> Result<u64, SqlxError> {
        self.check()?;
        let purged = self
            .seen
            .lock()
            .unwrap()
            .remove(key)
            .map_or(0, |hashes| hashes.len() as u64);
        if purged > 0 {
            self.wrote();
        }
        Ok(purged)
    }
}

/// A feed that replays a fixed list of events, optionally failing the next
/// few fetches.
#[derive(Default)]
pub struct ScriptedFeed {
    events: Mutex<Vec<TransferEvent>>,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_events(&self, events: Vec<TransferEvent>) {
        *self.events.lock().unwrap() = events;
    }

    pub fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransferFeed for ScriptedFeed {
    async fn fetch_transfers(&self, _wallet_address: &str) -> Result<Vec<TransferEvent>, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FeedError::Status(503));
        }

        Ok(self.events.lock().unwrap().clone())
    }
}

/// Records every delivered message.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(i64, String)>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("chat {} is unreachable", chat_id));
        }

        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}
