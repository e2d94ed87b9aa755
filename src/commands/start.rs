use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{help, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;

pub struct StartCommand;

impl CommandHandler for StartCommand {
    fn command_name() -> &'static str {
        "start"
    }

    fn description() -> &'static str {
        "start the bot"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _args: String,
        dialogue: Option<MyDialogue>,
        _services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Start command received in chat {}", msg.chat.id);

        // Drop any half-finished rename
        if let Some(dialogue) = dialogue {
            dialogue.update(State::Start).await?;
        }

        help::send_help(&bot, msg.chat.id).await
    }
}
