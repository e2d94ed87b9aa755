use crate::bsc::FeedError;

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Explorer feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("BSC RPC error: {0}")]
    Rpc(String),

    #[error("Telegram API error: {0}")]
    TelegramApi(#[from] teloxide::RequestError),

    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("Wallet {0} is not being watched")]
    WalletNotWatched(String),
}
