use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::interactor::watch_interactor::WatchInteractorImpl;
use crate::presenter::watch_presenter::{WatchPresenter, WatchPresenterImpl, RENAME_USAGE};
use crate::view::watch_view::{TelegramWatchView, WatchView};

pub type TelegramWatchPresenter = WatchPresenterImpl<WatchInteractorImpl, TelegramWatchView>;

pub fn create_watch_presenter(
    bot: Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> TelegramWatchPresenter {
    let interactor = Arc::new(WatchInteractorImpl::new(services.watch_registry()));
    let view = Arc::new(TelegramWatchView::new(bot, chat_id));
    WatchPresenterImpl::new(interactor, view)
}

/// Splits `/rename` arguments into the address and the (possibly multi-word)
/// name.
pub fn parse_rename_args(args: &str) -> Option<(&str, &str)> {
    let (wallet_address, new_name) = args.trim().split_once(char::is_whitespace)?;
    let new_name = new_name.trim();
    if new_name.is_empty() {
        None
    } else {
        Some((wallet_address, new_name))
    }
}

pub struct WatchCommand;

impl CommandHandler for WatchCommand {
    fn command_name() -> &'static str {
        "watch"
    }

    fn description() -> &'static str {
        "watch a wallet for new token transfers"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;
        info!("Watch command received in chat {}: {}", chat_id, args);

        let wallet_address = args.split_whitespace().next().unwrap_or("");
        create_watch_presenter(bot, chat_id, &services)
            .start_watch(chat_id.0, wallet_address)
            .await
    }
}

pub struct WatchedCommand;

impl CommandHandler for WatchedCommand {
    fn command_name() -> &'static str {
        "watched"
    }

    fn description() -> &'static str {
        "list the wallets watched in this chat"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;
        info!("Watched command received in chat {}", chat_id);

        create_watch_presenter(bot, chat_id, &services)
            .show_watched(chat_id.0, None)
            .await
    }
}

pub struct StopWatchCommand;

impl CommandHandler for StopWatchCommand {
    fn command_name() -> &'static str {
        "stopwatch"
    }

    fn description() -> &'static str {
        "stop watching a wallet"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;
        info!("Stopwatch command received in chat {}: {}", chat_id, args);

        let presenter = create_watch_presenter(bot, chat_id, &services);
        match args.split_whitespace().next() {
            Some(wallet_address) => presenter.confirm_stop(wallet_address, None).await,
            None => presenter.show_stop_menu(chat_id.0).await,
        }
    }
}

pub struct RenameCommand;

impl CommandHandler for RenameCommand {
    fn command_name() -> &'static str {
        "rename"
    }

    fn description() -> &'static str {
        "rename a watched wallet"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;
        info!("Rename command received in chat {}", chat_id);

        match parse_rename_args(&args) {
            Some((wallet_address, new_name)) => {
                create_watch_presenter(bot, chat_id, &services)
                    .rename_watch(chat_id.0, wallet_address, new_name)
                    .await
            }
            None => {
                TelegramWatchView::new(bot, chat_id)
                    .display_error(format!("Please provide an address and a name. Usage: {}", RENAME_USAGE))
                    .await
            }
        }
    }
}

// Handler for the new name after the "Rename" button
pub async fn receive_wallet_name(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    wallet_address: String,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let chat_id = msg.chat.id;

    match msg.text().map(str::trim).filter(|text| !text.is_empty()) {
        Some(new_name) => {
            dialogue.update(State::Start).await?;
            create_watch_presenter(bot, chat_id, &services)
                .rename_watch(chat_id.0, &wallet_address, new_name)
                .await?;
        }
        None => {
            bot.send_message(chat_id, "Please send the new name as text.")
                .await?;
        }
    }

    Ok(())
}
