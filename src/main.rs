//! BSC Wallet Watch Bot for Telegram - Main executable
//!
//! This is the entry point for the Telegram bot application that watches
//! Binance Smart Chain wallets and posts an alert to the chat for every new
//! token transfer.
use anyhow::Context;
use bsc_watch_bot::{create_application, AppConfig, Router};
use dotenv::dotenv;
use log::{error, info};
use teloxide::dptree;

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!(
        "Starting BSC Wallet Watch Telegram Bot v{}",
        bsc_watch_bot::VERSION
    );

    let config = AppConfig::from_env()
        .context("Failed to load configuration (TELEGRAM_BOT_TOKEN and BSCSCAN_API_KEY are required)")?;

    // Initialize the application components
    info!("Initializing bot application...");
    let (bot, router, service_container, storage) = create_application(config).await?;

    // Restore the watches persisted before the last shutdown
    let watch_registry = service_container.watch_registry();
    if let Err(e) = watch_registry.reconcile_on_startup().await {
        error!("Failed to restore wallet watches: {}", e);
    }

    // Get the handler from the router
    let handler = router.setup_handlers();

    // Build dispatcher with dependency injections and control-C handling
    let mut dispatcher = teloxide::dispatching::Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service_container.clone(), storage])
        .enable_ctrlc_handler()
        .build();

    info!("Bot is running! Press Ctrl+C to stop.");
    dispatcher.dispatch().await;

    // Stop wallet watches
    info!("Stopping wallet watches...");
    watch_registry.shutdown().await;
    service_container.db_pool().close().await;

    Ok(())
}
