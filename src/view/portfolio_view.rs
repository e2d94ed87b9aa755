use crate::bsc::format_amount;
use crate::entity::{Portfolio, TradeSummary};
use crate::view::alert_view::BSCSCAN_TX_URL;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{Message, ParseMode},
    utils::html,
    Bot,
};

#[async_trait]
pub trait PortfolioView: Send + Sync {
    async fn display_loading(&self) -> Result<Option<Message>>;
    async fn display_portfolio(&self, portfolio: Portfolio, message: Option<Message>) -> Result<()>;
    async fn display_invalid_address(&self, input: &str) -> Result<()>;
    async fn display_error(&self, error_message: String, message: Option<Message>) -> Result<()>;
}

pub struct TelegramPortfolioView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramPortfolioView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

fn format_trade(title: &str, trade: &TradeSummary) -> String {
    format!(
        "\n{}\n\
        • Token: {}\n\
        • Amount: {}\n\
        • Timestamp: {}\n\
        • <a href=\"{}{}\">View Transaction</a>\n",
        title,
        html::escape(&trade.token_symbol),
        format_amount(trade.amount, 2),
        trade.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        BSCSCAN_TX_URL,
        html::escape(&trade.tx_hash),
    )
}

/// HTML portfolio summary: native balance first, then held tokens and the
/// latest buy and sell.
pub fn format_portfolio(portfolio: &Portfolio) -> String {
    let mut text = format!(
        "📊 <b>Portfolio for</b> <code>{}</code>\n\n\
        ⛓️ <b>BNB Balance:</b>\n\
        💰 Total: {} BNB (~${} USD)\n\n\
        🔢 <b>Tokens Held:</b> {}\n\n",
        portfolio.wallet_address,
        format_amount(portfolio.bnb_balance, 7),
        format_amount(portfolio.bnb_value_usd(), 2),
        portfolio.tokens.len() + 1,
    );

    text.push_str(&format!(
        "• BNB: {}\n",
        format_amount(portfolio.bnb_balance, 2)
    ));
    for token in &portfolio.tokens {
        text.push_str(&format!(
            "• {}: {}\n",
            html::escape(&token.symbol),
            format_amount(token.amount, 2)
        ));
    }

    if let Some(trade) = &portfolio.last_buy {
        text.push_str(&format_trade("🟢 <b>Last Buy:</b>", trade));
    }
    if let Some(trade) = &portfolio.last_sell {
        text.push_str(&format_trade("🔴 <b>Last Sell:</b>", trade));
    }

    text
}

#[async_trait]
impl PortfolioView for TelegramPortfolioView {
    async fn display_loading(&self) -> Result<Option<Message>> {
        let message = self
            .bot
            .send_message(self.chat_id, "Fetching wallet portfolio...")
            .await?;

        Ok(Some(message))
    }

    async fn display_portfolio(&self, portfolio: Portfolio, message: Option<Message>) -> Result<()> {
        let text = format_portfolio(&portfolio);

        if let Some(msg) = message {
            self.bot
                .edit_message_text(self.chat_id, msg.id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        } else {
            self.bot
                .send_message(self.chat_id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }

        Ok(())
    }

    async fn display_invalid_address(&self, input: &str) -> Result<()> {
        let text = if input.is_empty() {
            "❌ Please provide a wallet address.\nExample: <code>/profile 0x123...</code>".to_string()
        } else {
            format!(
                "❌ <code>{}</code> is not a valid BSC address.\nExample: <code>/profile 0x123...</code>",
                html::escape(input)
            )
        };

        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }

    async fn display_error(&self, error_message: String, message: Option<Message>) -> Result<()> {
        let text = format!("Error: {}", error_message);

        if let Some(msg) = message {
            self.bot
                .edit_message_text(self.chat_id, msg.id, text)
                .await?;
        } else {
            self.bot.send_message(self.chat_id, text).await?;
        }

        Ok(())
    }
}
