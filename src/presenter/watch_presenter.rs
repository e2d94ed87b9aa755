use crate::entity::BotError;
use crate::interactor::watch_interactor::WatchInteractor;
use crate::services::watch_registry::{StopOutcome, WatchOutcome};
use crate::view::watch_view::WatchView;
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use teloxide::types::Message;

pub const WATCH_USAGE: &str = "/watch 0x123...";
pub const STOPWATCH_USAGE: &str = "/stopwatch 0x123...";
pub const RENAME_USAGE: &str = "/rename 0x123... My Wallet";

#[async_trait]
pub trait WatchPresenter: Send + Sync {
    async fn start_watch(&self, chat_id: i64, wallet_address: &str) -> Result<()>;
    async fn show_watched(&self, chat_id: i64, message: Option<Message>) -> Result<()>;
    async fn show_stop_menu(&self, chat_id: i64) -> Result<()>;
    async fn confirm_stop(&self, wallet_address: &str, message: Option<Message>) -> Result<()>;
    async fn stop_watch(&self, chat_id: i64, wallet_address: &str, message: Option<Message>)
        -> Result<()>;
    async fn keep_watch(&self, wallet_address: &str, message: Option<Message>) -> Result<()>;
    /// Returns true when the chat should now send the new name.
    async fn prompt_for_name(&self, chat_id: i64, wallet_address: &str) -> Result<bool>;
    async fn rename_watch(&self, chat_id: i64, wallet_address: &str, new_name: &str)
        -> Result<()>;
}

pub struct WatchPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> WatchPresenterImpl<I, V>
where
    I: WatchInteractor,
    V: WatchView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }

    // Shows a usage hint for invalid addresses and a plain error otherwise
    async fn display_failure(&self, e: anyhow::Error, usage: &str) -> Result<()> {
        match e.downcast_ref::<BotError>() {
            Some(BotError::InvalidAddress(input)) => {
                self.view.display_invalid_address(input, usage).await
            }
            Some(BotError::WalletNotWatched(address)) => {
                self.view.display_not_watching(address, None).await
            }
            _ => self.view.display_error(e.to_string()).await,
        }
    }
}

#[async_trait]
impl<I, V> WatchPresenter for WatchPresenterImpl<I, V>
where
    I: WatchInteractor + Send + Sync,
    V: WatchView + Send + Sync,
{
    async fn start_watch(&self, chat_id: i64, wallet_address: &str) -> Result<()> {
        match self.interactor.start_watch(chat_id, wallet_address).await {
            Ok(WatchOutcome::Started) => {
                info!("Chat {} started watching {}", chat_id, wallet_address);
                self.view.display_watch_started(wallet_address.trim()).await
            }
            Ok(WatchOutcome::AlreadyWatching) => {
                self.view.display_already_watching(wallet_address.trim()).await
            }
            Err(e) => self.display_failure(e, WATCH_USAGE).await,
        }
    }

    async fn show_watched(&self, chat_id: i64, message: Option<Message>) -> Result<()> {
        match self.interactor.get_watches(chat_id).await {
            Ok(wallets) => self.view.display_watched(wallets, message).await,
            Err(e) => self.view.display_error(e.to_string()).await,
        }
    }

    async fn show_stop_menu(&self, chat_id: i64) -> Result<()> {
        match self.interactor.get_watches(chat_id).await {
            Ok(wallets) => self.view.display_stop_menu(wallets).await,
            Err(e) => self.view.display_error(e.to_string()).await,
        }
    }

    async fn confirm_stop(&self, wallet_address: &str, message: Option<Message>) -> Result<()> {
        if !crate::bsc::validate_bsc_address(wallet_address) {
            return self
                .view
                .display_invalid_address(wallet_address.trim(), STOPWATCH_USAGE)
                .await;
        }

        self.view
            .display_stop_confirmation(wallet_address.trim(), message)
            .await
    }

    async fn stop_watch(
        &self,
        chat_id: i64,
        wallet_address: &str,
        message: Option<Message>,
    ) -> Result<()> {
        match self.interactor.stop_watch(chat_id, wallet_address).await {
            Ok(StopOutcome::Stopped) => {
                info!("Chat {} stopped watching {}", chat_id, wallet_address);
                self.view.display_stopped(wallet_address.trim(), message).await
            }
            Ok(StopOutcome::WasNotWatching) => {
                self.view
                    .display_not_watching(wallet_address.trim(), message)
                    .await
            }
            Err(e) => self.display_failure(e, STOPWATCH_USAGE).await,
        }
    }

    async fn keep_watch(&self, wallet_address: &str, message: Option<Message>) -> Result<()> {
        self.view.display_still_watching(wallet_address, message).await
    }

    async fn prompt_for_name(&self, chat_id: i64, wallet_address: &str) -> Result<bool> {
        match self.interactor.get_watch(chat_id, wallet_address).await {
            Ok(Some(wallet)) => {
                self.view.prompt_for_wallet_name(&wallet).await?;
                Ok(true)
            }
            Ok(None) => {
                self.view
                    .display_not_watching(wallet_address.trim(), None)
                    .await?;
                Ok(false)
            }
            Err(e) => {
                self.display_failure(e, RENAME_USAGE).await?;
                Ok(false)
            }
        }
    }

    async fn rename_watch(&self, chat_id: i64, wallet_address: &str, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return self
                .view
                .display_error(format!("The name cannot be empty. Usage: {}", RENAME_USAGE))
                .await;
        }

        match self
            .interactor
            .rename_watch(chat_id, wallet_address, new_name)
            .await
        {
            Ok(()) => self.view.display_renamed(wallet_address.trim(), new_name).await,
            Err(e) => self.display_failure(e, RENAME_USAGE).await,
        }
    }
}
