pub mod bsc;
pub mod commands;
pub mod config;
pub mod di;
pub mod entity;
pub mod interactor;
pub mod presenter;
pub mod router;
pub mod services;
pub mod view;

#[cfg(test)]
pub mod test_helpers;

use anyhow::Context;
use log::info;
use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, Bot};

// Re-export commonly used items
pub use config::AppConfig;
pub use di::ServiceContainer;
pub use entity::*;
pub use router::{Router, TelegramRouter};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Opens the database, applies migrations and wires the services together.
pub async fn create_application(
    config: AppConfig,
) -> anyhow::Result<(Bot, TelegramRouter, Arc<ServiceContainer>, Arc<InMemStorage<State>>)> {
    interactor::db::ensure_database_dir(&config.database_url)
        .context("Failed to create the database directory")?;

    info!("Connecting to database...");
    let db_pool = interactor::db::connect(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to create database connection pool")?;

    info!("Running database migrations...");
    interactor::db::run_migrations(&db_pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed successfully");

    let bot = Bot::new(&config.telegram_bot_token);
    let services = Arc::new(ServiceContainer::new(config, Arc::new(db_pool), bot.clone()));
    let router = TelegramRouter::new(services.clone());
    let storage = InMemStorage::<State>::new();

    Ok((bot, router, services, storage))
}
