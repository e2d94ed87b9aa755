use crate::bsc::shorten_address;
use crate::commands::ui;
use crate::entity::WatchedWallet;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardMarkup, Message, ParseMode},
    utils::html,
    Bot,
};

#[async_trait]
pub trait WatchView: Send + Sync {
    async fn display_watch_started(&self, wallet_address: &str) -> Result<()>;
    async fn display_already_watching(&self, wallet_address: &str) -> Result<()>;
    async fn display_watched(&self, wallets: Vec<WatchedWallet>, message: Option<Message>)
        -> Result<()>;
    async fn display_stop_menu(&self, wallets: Vec<WatchedWallet>) -> Result<()>;
    async fn display_stop_confirmation(
        &self,
        wallet_address: &str,
        message: Option<Message>,
    ) -> Result<()>;
    async fn display_stopped(&self, wallet_address: &str, message: Option<Message>) -> Result<()>;
    async fn display_not_watching(&self, wallet_address: &str, message: Option<Message>)
        -> Result<()>;
    async fn display_still_watching(
        &self,
        wallet_address: &str,
        message: Option<Message>,
    ) -> Result<()>;
    async fn prompt_for_wallet_name(&self, wallet: &WatchedWallet) -> Result<()>;
    async fn display_renamed(&self, wallet_address: &str, new_name: &str) -> Result<()>;
    async fn display_invalid_address(&self, input: &str, usage: &str) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

pub struct TelegramWatchView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramWatchView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    // Edit the callback message when there is one, otherwise send a new message
    async fn reply(
        &self,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
        message: Option<Message>,
    ) -> Result<()> {
        match message {
            Some(msg) => {
                let request = self
                    .bot
                    .edit_message_text(self.chat_id, msg.id, text)
                    .parse_mode(ParseMode::Html);
                match keyboard {
                    Some(keyboard) => request.reply_markup(keyboard).await?,
                    None => request.await?,
                };
            }
            None => {
                let request = self
                    .bot
                    .send_message(self.chat_id, text)
                    .parse_mode(ParseMode::Html);
                match keyboard {
                    Some(keyboard) => request.reply_markup(keyboard).await?,
                    None => request.await?,
                };
            }
        }

        Ok(())
    }
}

/// HTML list of a chat's watched wallets.
pub fn format_watched_list(wallets: &[WatchedWallet]) -> String {
    let mut text = format!("<b>👀 Watched Wallets ({})</b>\n\n", wallets.len());

    for wallet in wallets {
        match wallet.custom_name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => text.push_str(&format!(
                "• <b>{}</b>\n  <code>{}</code>\n",
                html::escape(name),
                wallet.wallet_address
            )),
            None => text.push_str(&format!("• <code>{}</code>\n", wallet.wallet_address)),
        }
    }

    text.push_str("\nNew token transfers of these wallets are posted here.");
    text
}

#[async_trait]
impl WatchView for TelegramWatchView {
    async fn display_watch_started(&self, wallet_address: &str) -> Result<()> {
        self.reply(
            format!(
                "✅ Started watching wallet <code>{}</code>.\n\nYou will get an alert for every new token transfer.",
                wallet_address
            ),
            Some(ui::create_main_menu_keyboard()),
            None,
        )
        .await
    }

    async fn display_already_watching(&self, wallet_address: &str) -> Result<()> {
        self.reply(
            format!(
                "Wallet <code>{}</code> is already being watched.",
                wallet_address
            ),
            None,
            None,
        )
        .await
    }

    async fn display_watched(
        &self,
        wallets: Vec<WatchedWallet>,
        message: Option<Message>,
    ) -> Result<()> {
        if wallets.is_empty() {
            return self
                .reply(
                    "No wallets are currently being watched.\nUse /watch &lt;address&gt; to start."
                        .to_string(),
                    None,
                    message,
                )
                .await;
        }

        self.reply(
            format_watched_list(&wallets),
            Some(ui::create_watched_keyboard(&wallets)),
            message,
        )
        .await
    }

    async fn display_stop_menu(&self, wallets: Vec<WatchedWallet>) -> Result<()> {
        if wallets.is_empty() {
            return self
                .reply(
                    "No wallets are currently being watched.".to_string(),
                    None,
                    None,
                )
                .await;
        }

        self.reply(
            "Select a wallet to stop watching:".to_string(),
            Some(ui::create_stop_menu_keyboard(&wallets)),
            None,
        )
        .await
    }

    async fn display_stop_confirmation(
        &self,
        wallet_address: &str,
        message: Option<Message>,
    ) -> Result<()> {
        self.reply(
            format!(
                "Do you want to stop watching wallet <code>{}</code>?",
                wallet_address
            ),
            Some(ui::create_stop_confirmation_keyboard(wallet_address)),
            message,
        )
        .await
    }

    async fn display_stopped(&self, wallet_address: &str, message: Option<Message>) -> Result<()> {
        self.reply(
            format!("🛑 Stopped watching wallet <code>{}</code>.", wallet_address),
            None,
            message,
        )
        .await
    }

    async fn display_not_watching(
        &self,
        wallet_address: &str,
        message: Option<Message>,
    ) -> Result<()> {
        self.reply(
            format!(
                "Wallet <code>{}</code> was not being watched.",
                wallet_address
            ),
            None,
            message,
        )
        .await
    }

    async fn display_still_watching(
        &self,
        wallet_address: &str,
        message: Option<Message>,
    ) -> Result<()> {
        self.reply(
            format!(
                "Continuing to watch wallet <code>{}</code>.",
                wallet_address
            ),
            None,
            message,
        )
        .await
    }

    async fn prompt_for_wallet_name(&self, wallet: &WatchedWallet) -> Result<()> {
        self.reply(
            format!(
                "Send the new name for wallet <code>{}</code> (currently <b>{}</b>):",
                shorten_address(&wallet.wallet_address),
                html::escape(wallet.display_name())
            ),
            None,
            None,
        )
        .await
    }

    async fn display_renamed(&self, wallet_address: &str, new_name: &str) -> Result<()> {
        self.reply(
            format!(
                "✅ Wallet <code>{}</code> is now called <b>{}</b>.",
                shorten_address(wallet_address),
                html::escape(new_name)
            ),
            Some(ui::create_main_menu_keyboard()),
            None,
        )
        .await
    }

    async fn display_invalid_address(&self, input: &str, usage: &str) -> Result<()> {
        let text = if input.is_empty() {
            format!("❌ Please provide a wallet address.\nExample: <code>{}</code>", usage)
        } else {
            format!(
                "❌ <code>{}</code> is not a valid BSC address.\nExample: <code>{}</code>",
                html::escape(input),
                usage
            )
        };

        self.reply(text, None, None).await
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("Error: {}", error_message))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn wallet(address: &str, name: Option<&str>) -> WatchedWallet {
        WatchedWallet {
            chat_id: 1,
            wallet_address: address.to_string(),
            custom_name: name.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_watched_list_shows_names_and_addresses() {
        let text = format_watched_list(&[
            wallet("0x8894e0a0c962cb723c1976a4421c95949be2d4e3", Some("<Whale>")),
            wallet("0x1111111111111111111111111111111111111111", None),
        ]);

        assert!(text.contains("Watched Wallets (2)"));
        assert!(text.contains("<b>&lt;Whale&gt;</b>"));
        assert!(text.contains("<code>0x8894e0a0c962cb723c1976a4421c95949be2d4e3</code>"));
        assert!(text.contains("• <code>0x1111111111111111111111111111111111111111</code>"));
    }

    #[test]
    fn test_empty_name_falls_back_to_address() {
        let text = format_watched_list(&[wallet("0x1111111111111111111111111111111111111111", Some(""))]);
        assert!(!text.contains("<b></b>"));
    }
}
