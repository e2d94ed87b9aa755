use async_trait::async_trait;
use log::warn;
use sqlx::{Error as SqlxError, SqlitePool};
use std::collections::HashSet;
use std::sync::Arc;

use crate::entity::{WatchKey, WatchedWallet};
use crate::interactor::db;

/// Durable record of watched wallets and of the transactions already seen for
/// each of them.
///
/// Every operation is atomic on its own. Watch tasks only touch rows of their
/// own key, so no cross-operation transaction is needed.
#[async_trait]
pub trait WatchStore: Send + Sync {
    /// Insert the pair if missing. `custom_name` replaces the stored name only
    /// when provided.
    async fn upsert_wallet(&self, key: &WatchKey, custom_name: Option<&str>)
        -> Result<(), SqlxError>;

    /// Delete the pair, returns whether it existed. Seen transactions are left
    /// alone.
    async fn remove_wallet(&self, key: &WatchKey) -> Result<bool, SqlxError>;

    async fn get_wallet(&self, key: &WatchKey) -> Result<Option<WatchedWallet>, SqlxError>;

    async fn list_wallets(&self, chat_id: i64) -> Result<Vec<WatchedWallet>, SqlxError>;

    async fn list_chats_with_wallets(&self) -> Result<Vec<i64>, SqlxError>;

    /// Returns false (and logs) when the pair is not watched.
    async fn rename_wallet(&self, key: &WatchKey, new_name: &str) -> Result<bool, SqlxError>;

    /// Idempotent: recording the same hash twice is a no-op.
    async fn mark_seen(&self, key: &WatchKey, tx_hash: &str) -> Result<(), SqlxError>;

    async fn seen_hashes(&self, key: &WatchKey) -> Result<HashSet<String>, SqlxError>;

    /// Forget every seen transaction of the pair, returns how many were removed.
    async fn purge_seen(&self, key: &WatchKey) -> Result<u64, SqlxError>;
}

pub struct SqliteWatchStore {
    pool: Arc<SqlitePool>,
}

impl SqliteWatchStore {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> Arc<SqlitePool> {
        self.pool.clone()
    }
}

#[async_trait]
impl WatchStore for SqliteWatchStore {
    async fn upsert_wallet(
        &self,
        key: &WatchKey,
        custom_name: Option<&str>,
    ) -> Result<(), SqlxError> {
        db::upsert_wallet(&self.pool, key, custom_name).await
    }

    async fn remove_wallet(&self, key: &WatchKey) -> Result<bool, SqlxError> {
        db::remove_wallet(&self.pool, key).await
    }

    async fn get_wallet(&self, key: &WatchKey) -> Result<Option<WatchedWallet>, SqlxError> {
        db::get_wallet(&self.pool, key).await
    }

    async fn list_wallets(&self, chat_id: i64) -> Result<Vec<WatchedWallet>, SqlxError> {
        db::get_chat_wallets(&self.pool, chat_id).await
    }

    async fn list_chats_with_wallets(&self) -> Result<Vec<i64>, SqlxError> {
        db::get_chats_with_wallets(&self.pool).await
    }

    async fn rename_wallet(&self, key: &WatchKey, new_name: &str) -> Result<bool, SqlxError> {
        let updated = db::update_wallet_name(&self.pool, key, new_name).await?;
        if !updated {
            warn!("Cannot rename {}: wallet is not watched", key);
        }
        Ok(updated)
    }

    async fn mark_seen(&self, key: &WatchKey, tx_hash: &str) -> Result<(), SqlxError> {
        db::add_seen_tx(&self.pool, key, tx_hash).await
    }

    async fn seen_hashes(&self, key: &WatchKey) -> Result<HashSet<String>, SqlxError> {
        db::get_seen_txs(&self.pool, key).await
    }

    async fn purge_seen(&self, key: &WatchKey) -> Result<u64, SqlxError> {
        db::delete_seen_txs(&self.pool, key).await
    }
}
