use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;

use crate::commands::ui::CallbackAction;
use crate::commands::watch::create_watch_presenter;
use crate::commands::{help, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::presenter::watch_presenter::WatchPresenter;

// Main callback handler function
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    // Extract the callback data
    let callback_data = match q.data.clone() {
        Some(data) => data,
        None => return Ok(()),
    };

    // Get the chat ID
    let chat_id = match q.message {
        Some(ref msg) => msg.chat().id,
        None => return Ok(()),
    };

    // Buttons edit the message they are attached to
    let message = q.regular_message().cloned();

    info!(
        "Received callback: {} in chat {}",
        callback_data, chat_id
    );

    // Acknowledge the callback query to stop loading animation
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        info!("Failed to answer callback query: {}", err);
    }

    let action = match CallbackAction::parse(&callback_data) {
        Some(action) => action,
        None => {
            warn!("Unknown callback data: {}", callback_data);
            return Ok(());
        }
    };

    match action {
        CallbackAction::Help => help::send_help(&bot, chat_id).await?,
        CallbackAction::Watched => {
            create_watch_presenter(bot, chat_id, &services)
                .show_watched(chat_id.0, message)
                .await?
        }
        CallbackAction::StopConfirm(wallet_address) => {
            create_watch_presenter(bot, chat_id, &services)
                .confirm_stop(&wallet_address, message)
                .await?
        }
        CallbackAction::StopYes(wallet_address) => {
            create_watch_presenter(bot, chat_id, &services)
                .stop_watch(chat_id.0, &wallet_address, message)
                .await?
        }
        CallbackAction::StopNo(wallet_address) => {
            create_watch_presenter(bot, chat_id, &services)
                .keep_watch(&wallet_address, message)
                .await?
        }
        CallbackAction::Rename(wallet_address) => {
            let awaiting_name = create_watch_presenter(bot, chat_id, &services)
                .prompt_for_name(chat_id.0, &wallet_address)
                .await?;

            if awaiting_name {
                dialogue
                    .update(State::AwaitingWalletName { wallet_address })
                    .await?;
            }
        }
    }

    Ok(())
}
