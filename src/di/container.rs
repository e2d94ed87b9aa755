use std::sync::Arc;

use sqlx::SqlitePool;
use teloxide::Bot;

use crate::bsc::{
    BalanceService, BscRpcClient, BscScanClient, CoinGeckoPriceService, PriceService, TransferFeed,
};
use crate::config::AppConfig;
use crate::services::notifier::{Notifier, TelegramNotifier};
use crate::services::watch_registry::WatchRegistry;
use crate::services::watch_store::{SqliteWatchStore, WatchStore};

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    // Core services
    db_pool: Arc<SqlitePool>,

    // BSC services
    transfer_feed: Arc<dyn TransferFeed>,
    balance_service: Arc<dyn BalanceService>,
    price_service: Arc<dyn PriceService>,

    // Wallet watches, shared with the dispatcher
    watch_registry: Arc<WatchRegistry>,
}

impl ServiceContainer {
    /// Create a new service container with essential dependencies
    pub fn new(config: AppConfig, db_pool: Arc<SqlitePool>, bot: Bot) -> Self {
        let watch_store =
            Arc::new(SqliteWatchStore::new(db_pool.clone())) as Arc<dyn WatchStore>;

        let transfer_feed = Arc::new(BscScanClient::new(
            &config.bscscan_api_url,
            &config.bscscan_api_key,
        )) as Arc<dyn TransferFeed>;

        let balance_service =
            Arc::new(BscRpcClient::new(&config.web3_provider_url)) as Arc<dyn BalanceService>;

        let price_service =
            Arc::new(CoinGeckoPriceService::new(&config.coingecko_api_url)) as Arc<dyn PriceService>;

        let notifier = Arc::new(TelegramNotifier::new(bot)) as Arc<dyn Notifier>;

        let watch_registry = Arc::new(WatchRegistry::new(
            watch_store,
            transfer_feed.clone(),
            notifier,
            config.poll_interval(),
        ));

        Self {
            db_pool,
            transfer_feed,
            balance_service,
            price_service,
            watch_registry,
        }
    }

    // Accessor methods

    pub fn db_pool(&self) -> Arc<SqlitePool> {
        self.db_pool.clone()
    }

    pub fn transfer_feed(&self) -> Arc<dyn TransferFeed> {
        self.transfer_feed.clone()
    }

    pub fn balance_service(&self) -> Arc<dyn BalanceService> {
        self.balance_service.clone()
    }

    pub fn price_service(&self) -> Arc<dyn PriceService> {
        self.price_service.clone()
    }

    pub fn watch_registry(&self) -> Arc<WatchRegistry> {
        self.watch_registry.clone()
    }
}
