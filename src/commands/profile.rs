use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::interactor::portfolio_interactor::PortfolioInteractorImpl;
use crate::presenter::portfolio_presenter::{PortfolioPresenter, PortfolioPresenterImpl};
use crate::view::portfolio_view::TelegramPortfolioView;

pub struct ProfileCommand;

impl CommandHandler for ProfileCommand {
    fn command_name() -> &'static str {
        "profile"
    }

    fn description() -> &'static str {
        "show the portfolio of a wallet"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let chat_id = msg.chat.id;
        let wallet_address = args.split_whitespace().next().unwrap_or("");

        info!(
            "Profile command received in chat {} for {}",
            chat_id, wallet_address
        );

        let interactor = Arc::new(PortfolioInteractorImpl::new(
            services.balance_service(),
            services.transfer_feed(),
            services.price_service(),
        ));
        let view = Arc::new(TelegramPortfolioView::new(bot, chat_id));
        let presenter = PortfolioPresenterImpl::new(interactor, view);

        presenter.show_portfolio(wallet_address).await?;

        Ok(())
    }
}
