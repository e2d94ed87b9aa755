use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bsc::shorten_address;
use crate::entity::WatchedWallet;

/// Actions carried in inline button callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    StopConfirm(String),
    StopYes(String),
    StopNo(String),
    Rename(String),
    Watched,
    Help,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "watched" => return Some(Self::Watched),
            "help" => return Some(Self::Help),
            _ => {}
        }

        let (action, wallet_address) = data.split_once(':')?;
        if wallet_address.is_empty() {
            return None;
        }
        let wallet_address = wallet_address.to_string();

        match action {
            "stop_confirm" => Some(Self::StopConfirm(wallet_address)),
            "stop_yes" => Some(Self::StopYes(wallet_address)),
            "stop_no" => Some(Self::StopNo(wallet_address)),
            "rename" => Some(Self::Rename(wallet_address)),
            _ => None,
        }
    }

    pub fn data(&self) -> String {
        match self {
            Self::StopConfirm(address) => format!("stop_confirm:{}", address),
            Self::StopYes(address) => format!("stop_yes:{}", address),
            Self::StopNo(address) => format!("stop_no:{}", address),
            Self::Rename(address) => format!("rename:{}", address),
            Self::Watched => "watched".to_string(),
            Self::Help => "help".to_string(),
        }
    }
}

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.data())
}

pub fn create_main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("👀 Watched Wallets", CallbackAction::Watched),
        button("❓ Help", CallbackAction::Help),
    ]])
}

/// One row per wallet with stop and rename buttons.
pub fn create_watched_keyboard(wallets: &[WatchedWallet]) -> InlineKeyboardMarkup {
    let rows = wallets
        .iter()
        .map(|wallet| {
            vec![
                button(
                    format!("🛑 Stop {}", shorten_address(&wallet.wallet_address)),
                    CallbackAction::StopConfirm(wallet.wallet_address.clone()),
                ),
                button(
                    "✏️ Rename",
                    CallbackAction::Rename(wallet.wallet_address.clone()),
                ),
            ]
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(rows)
}

pub fn create_stop_menu_keyboard(wallets: &[WatchedWallet]) -> InlineKeyboardMarkup {
    let rows = wallets
        .iter()
        .map(|wallet| {
            vec![button(
                wallet.display_name(),
                CallbackAction::StopConfirm(wallet.wallet_address.clone()),
            )]
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(rows)
}

pub fn create_stop_confirmation_keyboard(wallet_address: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("Yes", CallbackAction::StopYes(wallet_address.to_string())),
        button("No", CallbackAction::StopNo(wallet_address.to_string())),
    ]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use teloxide::types::InlineKeyboardButtonKind;

    const WALLET: &str = "0x8894e0a0c962cb723c1976a4421c95949be2d4e3";

    fn callback_data(button: &InlineKeyboardButton) -> &str {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            other => panic!("unexpected button kind: {:?}", other),
        }
    }

    #[test]
    fn test_parse_callback_actions() {
        assert_eq!(
            CallbackAction::parse(&format!("stop_confirm:{}", WALLET)),
            Some(CallbackAction::StopConfirm(WALLET.to_string()))
        );
        assert_eq!(
            CallbackAction::parse(&format!("stop_yes:{}", WALLET)),
            Some(CallbackAction::StopYes(WALLET.to_string()))
        );
        assert_eq!(
            CallbackAction::parse(&format!("stop_no:{}", WALLET)),
            Some(CallbackAction::StopNo(WALLET.to_string()))
        );
        assert_eq!(
            CallbackAction::parse(&format!("rename:{}", WALLET)),
            Some(CallbackAction::Rename(WALLET.to_string()))
        );
        assert_eq!(CallbackAction::parse("watched"), Some(CallbackAction::Watched));
        assert_eq!(CallbackAction::parse("help"), Some(CallbackAction::Help));
    }

    #[test]
    fn test_parse_rejects_unknown_data() {
        assert_eq!(CallbackAction::parse("stop_yes:"), None);
        assert_eq!(CallbackAction::parse("buy:0x1"), None);
        assert_eq!(CallbackAction::parse("menu"), None);
    }

    #[test]
    fn test_data_fits_telegram_limit() {
        let action = CallbackAction::StopConfirm(WALLET.to_string());
        assert!(action.data().len() <= 64);
        assert_eq!(CallbackAction::parse(&action.data()), Some(action));
    }

    #[test]
    fn test_watched_keyboard_has_row_per_wallet() {
        let wallets = vec![WatchedWallet {
            chat_id: 1,
            wallet_address: WALLET.to_string(),
            custom_name: Some("Whale".to_string()),
            created_at: Utc::now(),
        }];

        let keyboard = create_watched_keyboard(&wallets);
        assert_eq!(keyboard.inline_keyboard.len(), 1);
        let row = &keyboard.inline_keyboard[0];
        assert_eq!(callback_data(&row[0]), format!("stop_confirm:{}", WALLET));
        assert_eq!(callback_data(&row[1]), format!("rename:{}", WALLET));

        let menu = create_stop_menu_keyboard(&wallets);
        assert_eq!(menu.inline_keyboard[0][0].text, "Whale");
    }

    #[test]
    fn test_stop_confirmation_keyboard() {
        let keyboard = create_stop_confirmation_keyboard(WALLET);
        let row = &keyboard.inline_keyboard[0];
        assert_eq!(callback_data(&row[0]), format!("stop_yes:{}", WALLET));
        assert_eq!(callback_data(&row[1]), format!("stop_no:{}", WALLET));
    }
}
