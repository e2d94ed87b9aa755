mod bot_error;
mod portfolio;
mod state;
mod transfer;
mod watched_wallet;

pub use bot_error::BotError;
pub use portfolio::{Portfolio, TokenBalance, TradeSummary};
pub use state::State;
pub use transfer::{TransferDirection, TransferEvent};
pub use watched_wallet::{WatchKey, WatchedWallet};
