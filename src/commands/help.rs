use super::{register_commands, ui, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, types::ParseMode};

pub struct HelpCommand;

/// Welcome text listing every command.
pub fn help_text() -> String {
    let mut text = String::from(
        "👋 <b>Welcome to the BSC Wallet Watch Bot!</b>\n\n\
        Track any Binance Smart Chain wallet and get an alert for every new token transfer.\n\n\
        <b>Commands:</b>\n",
    );

    for (name, description) in register_commands() {
        text.push_str(&format!("/{} - {}\n", name, description));
    }

    text
}

/// Sends the help text with the main menu.
pub async fn send_help(bot: &Bot, chat_id: ChatId) -> Result<()> {
    bot.send_message(chat_id, help_text())
        .parse_mode(ParseMode::Html)
        .reply_markup(ui::create_main_menu_keyboard())
        .await?;

    Ok(())
}

impl CommandHandler for HelpCommand {
    fn command_name() -> &'static str {
        "help"
    }

    fn description() -> &'static str {
        "display this help message"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _args: String,
        _dialogue: Option<MyDialogue>,
        _services: Arc<ServiceContainer>,
    ) -> Result<()> {
        send_help(&bot, msg.chat.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_watch_commands() {
        let text = help_text();

        for command in ["/watch", "/watched", "/stopwatch", "/rename", "/profile"] {
            assert!(text.contains(command), "{} missing from help", command);
        }
    }
}
