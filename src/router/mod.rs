use async_trait::async_trait;
use std::sync::Arc;
use teloxide::{
    dispatching::dialogue::InMemStorage, dispatching::UpdateHandler, prelude::*,
};

use crate::commands::{
    self, callback::handle_callback, BotCommands, CommandHandler, MyDialogue,
};
use crate::di::ServiceContainer;
use crate::entity::State;

// Base router trait
#[async_trait]
pub trait Router: Send + Sync {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error>;
}

// Command router implementation
pub struct TelegramRouter {
    services: Arc<ServiceContainer>,
}

impl TelegramRouter {
    pub fn new(services: Arc<ServiceContainer>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Router for TelegramRouter {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error> {
        use dptree::case;
        use teloxide::dispatching::UpdateFilterExt;

        let services_for_start = self.services.clone();
        let services_for_help = self.services.clone();
        let services_for_profile = self.services.clone();
        let services_for_watch = self.services.clone();
        let services_for_watched = self.services.clone();
        let services_for_stopwatch = self.services.clone();
        let services_for_rename = self.services.clone();

        // Use BotCommands enum with teloxide's command filter
        let command_handler = teloxide::filter_command::<BotCommands, _>()
            .branch(case![BotCommands::Start].endpoint(
                move |bot: Bot, msg: Message, dialogue: MyDialogue| {
                    let services = services_for_start.clone();
                    async move {
                        commands::start::StartCommand::execute(
                            bot,
                            msg,
                            String::new(),
                            Some(dialogue),
                            services,
                        )
                        .await
                    }
                },
            ))
            .branch(case![BotCommands::Help].endpoint(
                move |bot: Bot, msg: Message, dialogue: MyDialogue| {
                    let services = services_for_help.clone();
                    async move {
                        commands::help::HelpCommand::execute(
                            bot,
                            msg,
                            String::new(),
                            Some(dialogue),
                            services,
                        )
                        .await
                    }
                },
            ))
            .branch(case![BotCommands::Profile(args)].endpoint(
                move |bot: Bot, msg: Message, args: String, dialogue: MyDialogue| {
                    let services = services_for_profile.clone();
                    async move {
                        commands::profile::ProfileCommand::execute(
                            bot,
                            msg,
                            args,
                            Some(dialogue),
                            services,
                        )
                        .await
                    }
                },
            ))
            .branch(case![BotCommands::Watch(args)].endpoint(
                move |bot: Bot, msg: Message, args: String, dialogue: MyDialogue| {
                    let services = services_for_watch.clone();
                    async move {
                        commands::watch::WatchCommand::execute(
                            bot,
                            msg,
                            args,
                            Some(dialogue),
                            services,
                        )
                        .await
                    }
                },
            ))
            .branch(case![BotCommands::Watched].endpoint(
                move |bot: Bot, msg: Message, dialogue: MyDialogue| {
                    let services = services_for_watched.clone();
                    async move {
                        commands::watch::WatchedCommand::execute(
                            bot,
                            msg,
                            String::new(),
                            Some(dialogue),
                            services,
                        )
                        .await
                    }
                },
            ))
            .branch(case![BotCommands::Stopwatch(args)].endpoint(
                move |bot: Bot, msg: Message, args: String, dialogue: MyDialogue| {
                    let services = services_for_stopwatch.clone();
                    async move {
                        commands::watch::StopWatchCommand::execute(
                            bot,
                            msg,
                            args,
                            Some(dialogue),
                            services,
                        )
                        .await
                    }
                },
            ))
            .branch(case![BotCommands::Rename(args)].endpoint(
                move |bot: Bot, msg: Message, args: String, dialogue: MyDialogue| {
                    let services = services_for_rename.clone();
                    async move {
                        commands::watch::RenameCommand::execute(
                            bot,
                            msg,
                            args,
                            Some(dialogue),
                            services,
                        )
                        .await
                    }
                },
            ));

        let services_for_dialog = self.services.clone();

        let message_handler = Update::filter_message().branch(command_handler).branch(
            case![State::AwaitingWalletName { wallet_address }].endpoint(
                move |bot: Bot, msg: Message, dialogue: MyDialogue, wallet_address: String| {
                    let services = services_for_dialog.clone();
                    async move {
                        commands::watch::receive_wallet_name(
                            bot,
                            msg,
                            dialogue,
                            wallet_address,
                            services,
                        )
                        .await
                    }
                },
            ),
        );

        let services_for_callbacks = self.services.clone();

        // Add callback query handler for our buttons
        let callback_handler = Update::filter_callback_query().endpoint(
            move |bot: Bot, q: CallbackQuery, dialogue: MyDialogue| {
                let services = services_for_callbacks.clone();
                async move { handle_callback(bot, q, dialogue, services).await }
            },
        );

        teloxide::dispatching::dialogue::enter::<Update, InMemStorage<State>, State, _>()
            .branch(message_handler)
            .branch(callback_handler)
    }
}
