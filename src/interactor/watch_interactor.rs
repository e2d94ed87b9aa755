use crate::bsc::validate_bsc_address;
use crate::entity::{BotError, WatchedWallet};
use crate::services::watch_registry::{StopOutcome, WatchOutcome, WatchRegistry};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait WatchInteractor: Send + Sync {
    async fn start_watch(&self, chat_id: i64, wallet_address: &str) -> Result<WatchOutcome>;
    async fn stop_watch(&self, chat_id: i64, wallet_address: &str) -> Result<StopOutcome>;
    async fn get_watches(&self, chat_id: i64) -> Result<Vec<WatchedWallet>>;
    async fn get_watch(&self, chat_id: i64, wallet_address: &str) -> Result<Option<WatchedWallet>>;
    async fn rename_watch(&self, chat_id: i64, wallet_address: &str, new_name: &str) -> Result<()>;
}

pub struct WatchInteractorImpl {
    registry: Arc<WatchRegistry>,
}

impl WatchInteractorImpl {
    pub fn new(registry: Arc<WatchRegistry>) -> Self {
        Self { registry }
    }

    fn check_address(wallet_address: &str) -> Result<(), BotError> {
        if validate_bsc_address(wallet_address) {
            Ok(())
        } else {
            Err(BotError::InvalidAddress(wallet_address.trim().to_string()))
        }
    }
}

#[async_trait]
impl WatchInteractor for WatchInteractorImpl {
    async fn start_watch(&self, chat_id: i64, wallet_address: &str) -> Result<WatchOutcome> {
        Ok(self.registry.start(chat_id, wallet_address).await?)
    }

    async fn stop_watch(&self, chat_id: i64, wallet_address: &str) -> Result<StopOutcome> {
        Self::check_address(wallet_address)?;
        Ok(self.registry.stop(chat_id, wallet_address).await?)
    }

    async fn get_watches(&self, chat_id: i64) -> Result<Vec<WatchedWallet>> {
        Ok(self.registry.list_watches(chat_id).await?)
    }

    async fn get_watch(&self, chat_id: i64, wallet_address: &str) -> Result<Option<WatchedWallet>> {
        Self::check_address(wallet_address)?;
        Ok(self.registry.get_watch(chat_id, wallet_address).await?)
    }

    async fn rename_watch(&self, chat_id: i64, wallet_address: &str, new_name: &str) -> Result<()> {
        Self::check_address(wallet_address)?;

        if self.registry.rename(chat_id, wallet_address, new_name).await? {
            Ok(())
        } else {
            Err(BotError::WalletNotWatched(wallet_address.trim().to_string()).into())
        }
    }
}
