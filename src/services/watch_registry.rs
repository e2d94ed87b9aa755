use chrono::Utc;
use futures::future::join_all;
use log::{error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::bsc::{validate_bsc_address, TransferFeed};
use crate::entity::{BotError, WatchKey, WatchedWallet};
use crate::services::notifier::Notifier;
use crate::services::watch_store::WatchStore;
use crate::services::watch_task::WatchTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    Started,
    AlreadyWatching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    WasNotWatching,
}

struct WatchHandle {
    cancellation_token: CancellationToken,
    join_handle: JoinHandle<()>,
}

impl WatchHandle {
    // A task that stopped on its own leaves a finished handle behind
    fn is_live(&self) -> bool {
        !self.join_handle.is_finished()
    }
}

/// Table of running watch tasks, one per (chat, wallet).
///
/// The store stays the source of truth: a wallet is persisted before its task
/// is spawned and removed before its task is cancelled. `start` and `stop`
/// both hold the task table lock across their store writes.
pub struct WatchRegistry {
    store: Arc<dyn WatchStore>,
    feed: Arc<dyn TransferFeed>,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
    tasks: Mutex<HashMap<WatchKey, WatchHandle>>,
}

impl WatchRegistry {
    pub fn new(
        store: Arc<dyn WatchStore>,
        feed: Arc<dyn TransferFeed>,
        notifier: Arc<dyn Notifier>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            store,
            feed,
            notifier,
            poll_interval,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Persist the wallet and spawn its watch task, unless one is already
    /// running.
    pub async fn start(&self, chat_id: i64, wallet_address: &str) -> Result<WatchOutcome, BotError> {
        if !validate_bsc_address(wallet_address) {
            return Err(BotError::InvalidAddress(wallet_address.to_string()));
        }

        let key = WatchKey::new(chat_id, wallet_address);
        let mut tasks = self.tasks.lock().await;

        if let Some(handle) = tasks.get(&key) {
            if handle.is_live() {
                info!("Wallet {} is already being watched", key);
                return Ok(WatchOutcome::AlreadyWatching);
            }
            tasks.remove(&key);
        }

        self.store.upsert_wallet(&key, None).await?;

        let handle = self.spawn(key.clone());
        tasks.insert(key, handle);

        Ok(WatchOutcome::Started)
    }

    /// Remove the wallet from the store, cancel its task and forget its seen
    /// transactions.
    pub async fn stop(&self, chat_id: i64, wallet_address: &str) -> Result<StopOutcome, BotError> {
        let key = WatchKey::new(chat_id, wallet_address);
        // Held until the purge so a concurrent start cannot re-add the row
        let mut tasks = self.tasks.lock().await;

        let removed = self.store.remove_wallet(&key).await?;

        let had_task = match tasks.remove(&key) {
            Some(handle) => {
                handle.cancellation_token.cancel();
                true
            }
            None => false,
        };

        if !removed && !had_task {
            return Ok(StopOutcome::WasNotWatching);
        }

        if !removed {
            warn!("Watch task for {} had no stored wallet", key);
        }

        match self.store.purge_seen(&key).await {
            Ok(purged) => info!(
                "Stopped watching {} ({} seen transactions purged)",
                key, purged
            ),
            Err(e) => error!("Failed to purge seen transactions for {}: {}", key, e),
        }

        Ok(StopOutcome::Stopped)
    }

    /// Spawn a task for every stored wallet that has no live task. Returns the
    /// number of tasks spawned.
    pub async fn reconcile_on_startup(&self) -> Result<usize, BotError> {
        let chats = self.store.list_chats_with_wallets().await?;
        let mut tasks = self.tasks.lock().await;
        let mut spawned = 0;

        for chat_id in &chats {
            let wallets = match self.store.list_wallets(*chat_id).await {
                Ok(wallets) => wallets,
                Err(e) => {
                    error!("Failed to load wallets of chat {}: {}", chat_id, e);
                    continue;
                }
            };

            for wallet in wallets {
                let key = wallet.key();
                if tasks.get(&key).map_or(false, WatchHandle::is_live) {
                    continue;
                }

                let handle = self.spawn(key.clone());
                tasks.insert(key, handle);
                spawned += 1;
            }
        }

        info!(
            "Restored {} watches across {} chats",
            spawned,
            chats.len()
        );

        Ok(spawned)
    }

    pub async fn list_watches(&self, chat_id: i64) -> Result<Vec<WatchedWallet>, BotError> {
        Ok(self.store.list_wallets(chat_id).await?)
    }

    pub async fn get_watch(
        &self,
        chat_id: i64,
        wallet_address: &str,
    ) -> Result<Option<WatchedWallet>, BotError> {
        let key = WatchKey::new(chat_id, wallet_address);
        Ok(self.store.get_wallet(&key).await?)
    }

    /// Set the display name of a watched wallet. Returns false when the wallet
    /// is not watched by this chat.
    pub async fn rename(
        &self,
        chat_id: i64,
        wallet_address: &str,
        new_name: &str,
    ) -> Result<bool, BotError> {
        let key = WatchKey::new(chat_id, wallet_address);
        Ok(self.store.rename_wallet(&key, new_name.trim()).await?)
    }

    pub async fn is_watching(&self, chat_id: i64, wallet_address: &str) -> bool {
        let key = WatchKey::new(chat_id, wallet_address);
        self.tasks
            .lock()
            .await
            .get(&key)
            .map_or(false, WatchHandle::is_live)
    }

    /// Number of live watch tasks; finished handles are pruned.
    pub async fn active_count(&self) -> usize {
        let mut tasks = self.tasks.lock().await;
        tasks.retain(|_, handle| handle.is_live());
        tasks.len()
    }

    /// Cancel every task and wait for all of them to exit.
    pub async fn shutdown(&self) {
        let handles: Vec<WatchHandle> = self.tasks.lock().await.drain().map(|(_, h)| h).collect();
        info!("Stopping {} watch tasks", handles.len());

        for handle in &handles {
            handle.cancellation_token.cancel();
        }

        for result in join_all(handles.into_iter().map(|h| h.join_handle)).await {
            if let Err(e) = result {
                error!("Watch task ended abnormally: {}", e);
            }
        }
    }

    fn spawn(&self, key: WatchKey) -> WatchHandle {
        let cancellation_token = CancellationToken::new();
        let task = WatchTask::new(
            key,
            Utc::now().timestamp(),
            self.poll_interval,
            self.store.clone(),
            self.feed.clone(),
            self.notifier.clone(),
            cancellation_token.clone(),
        );

        WatchHandle {
            cancellation_token,
            join_handle: tokio::spawn(task.run()),
        }
    }
}
