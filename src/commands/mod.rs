use anyhow::Result;
use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::*};

use crate::di::ServiceContainer;
use crate::entity::State;
use teloxide::dispatching::dialogue::Dialogue;

pub mod callback;
pub mod help;
pub mod profile;
pub mod start;
pub mod ui;
pub mod watch;

pub type MyDialogue = Dialogue<State, InMemStorage<State>>;

/// Trait that defines a command handler
pub trait CommandHandler {
    /// The command name in lowercase
    fn command_name() -> &'static str;

    /// The command description for help
    fn description() -> &'static str;

    /// Execute the command; `args` is the text after the command
    async fn execute(
        bot: Bot,
        msg: Message,
        args: String,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()>;
}

/// Register all command handlers in the command system
pub fn register_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            start::StartCommand::command_name(),
            start::StartCommand::description(),
        ),
        (
            profile::ProfileCommand::command_name(),
            profile::ProfileCommand::description(),
        ),
        (
            watch::WatchCommand::command_name(),
            watch::WatchCommand::description(),
        ),
        (
            watch::WatchedCommand::command_name(),
            watch::WatchedCommand::description(),
        ),
        (
            watch::StopWatchCommand::command_name(),
            watch::StopWatchCommand::description(),
        ),
        (
            watch::RenameCommand::command_name(),
            watch::RenameCommand::description(),
        ),
        (
            help::HelpCommand::command_name(),
            help::HelpCommand::description(),
        ),
    ]
}

/// Bot Commands enum for teloxide command filter
#[derive(teloxide::utils::command::BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum BotCommands {
    #[command(description = "start the bot and show the main menu")]
    Start,
    #[command(description = "show the portfolio of a wallet")]
    Profile(String),
    #[command(description = "watch a wallet for new token transfers")]
    Watch(String),
    #[command(description = "list the wallets watched in this chat")]
    Watched,
    #[command(description = "stop watching a wallet")]
    Stopwatch(String),
    #[command(description = "rename a watched wallet")]
    Rename(String),
    #[command(description = "display this help message")]
    Help,
}
