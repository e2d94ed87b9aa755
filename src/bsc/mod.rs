pub mod explorer;
pub mod price_service;
pub mod rpc;
pub mod utils;

pub use explorer::{parse_transfer_feed, BscScanClient, FeedError, TransferFeed};
pub use price_service::{CoinGeckoPriceService, PriceService};
pub use rpc::{BalanceService, BscRpcClient};
pub use utils::{format_amount, shorten_address, validate_bsc_address};
