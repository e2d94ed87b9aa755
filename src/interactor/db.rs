use crate::entity::{WatchKey, WatchedWallet};
use chrono::Utc;
use log::{debug, info};
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Error as SqlxError, Row, SqlitePool};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

// Create the directory holding a file-backed SQLite database
pub fn ensure_database_dir(database_url: &str) -> std::io::Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || is_memory_database(database_url) {
        return Ok(());
    }

    if let Some(dir) = Path::new(path).parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
            info!("Created database directory: {}", dir.display());
        }
    }

    Ok(())
}

// Every connection to `sqlite::memory:` opens its own empty database
pub fn is_memory_database(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

// Open a connection pool, creating the database file if needed
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if is_memory_database(database_url) {
        debug!("In-memory database, using a single connection");
        // The database lives only as long as its one connection
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    pool_options.connect_with(options).await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

// Insert a watched wallet; an existing custom name is only replaced by a new one
pub async fn upsert_wallet(
    pool: &SqlitePool,
    key: &WatchKey,
    custom_name: Option<&str>,
) -> Result<(), SqlxError> {
    sqlx::query(
        "INSERT INTO watched_wallets (chat_id, wallet_address, custom_name, created_at) \
         VALUES (?, ?, ?, ?) \
         ON CONFLICT (chat_id, wallet_address) \
         DO UPDATE SET custom_name = COALESCE(excluded.custom_name, watched_wallets.custom_name)",
    )
    .bind(key.chat_id)
    .bind(&key.wallet_address)
    .bind(custom_name)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    info!(
        "Added/updated wallet {} for chat {} (name: {:?})",
        key.wallet_address, key.chat_id, custom_name
    );

    Ok(())
}

// Delete a watched wallet, returns whether it existed
pub async fn remove_wallet(pool: &SqlitePool, key: &WatchKey) -> Result<bool, SqlxError> {
    let result =
        sqlx::query("DELETE FROM watched_wallets WHERE chat_id = ? AND wallet_address = ?")
            .bind(key.chat_id)
            .bind(&key.wallet_address)
            .execute(pool)
            .await?;

    info!(
        "Removed wallet {} for chat {} ({} rows)",
        key.wallet_address,
        key.chat_id,
        result.rows_affected()
    );

    Ok(result.rows_affected() > 0)
}

pub async fn get_wallet(
    pool: &SqlitePool,
    key: &WatchKey,
) -> Result<Option<WatchedWallet>, SqlxError> {
    sqlx::query_as::<_, WatchedWallet>(
        "SELECT chat_id, wallet_address, custom_name, created_at FROM watched_wallets \
         WHERE chat_id = ? AND wallet_address = ?",
    )
    .bind(key.chat_id)
    .bind(&key.wallet_address)
    .fetch_optional(pool)
    .await
}

pub async fn get_chat_wallets(
    pool: &SqlitePool,
    chat_id: i64,
) -> Result<Vec<WatchedWallet>, SqlxError> {
    let wallets = sqlx::query_as::<_, WatchedWallet>(
        "SELECT chat_id, wallet_address, custom_name, created_at FROM watched_wallets \
         WHERE chat_id = ? ORDER BY created_at ASC, wallet_address ASC",
    )
    .bind(chat_id)
    .fetch_all(pool)
    .await?;

    debug!("Retrieved {} wallets for chat {}", wallets.len(), chat_id);

    Ok(wallets)
}

pub async fn get_chats_with_wallets(pool: &SqlitePool) -> Result<Vec<i64>, SqlxError> {
    let rows = sqlx::query("SELECT DISTINCT chat_id FROM watched_wallets ORDER BY chat_id")
        .fetch_all(pool)
        .await?;

    rows.iter().map(|row| row.try_get("chat_id")).collect()
}

// Update the custom name of a wallet, returns false when no such watch exists
pub async fn update_wallet_name(
    pool: &SqlitePool,
    key: &WatchKey,
    custom_name: &str,
) -> Result<bool, SqlxError> {
    let result = sqlx::query(
        "UPDATE watched_wallets SET custom_name = ? WHERE chat_id = ? AND wallet_address = ?",
    )
    .bind(custom_name)
    .bind(key.chat_id)
    .bind(&key.wallet_address)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// Record a seen transaction, duplicates are ignored
pub async fn add_seen_tx(pool: &SqlitePool, key: &WatchKey, tx_hash: &str) -> Result<(), SqlxError> {
    sqlx::query(
        "INSERT OR IGNORE INTO seen_transactions (chat_id, wallet_address, tx_hash, seen_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(key.chat_id)
    .bind(&key.wallet_address)
    .bind(tx_hash)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    debug!("Marked {} as seen for {}", tx_hash, key);

    Ok(())
}

pub async fn get_seen_txs(pool: &SqlitePool, key: &WatchKey) -> Result<HashSet<String>, SqlxError> {
    let rows = sqlx::query(
        "SELECT tx_hash FROM seen_transactions WHERE chat_id = ? AND wallet_address = ?",
    )
    .bind(key.chat_id)
    .bind(&key.wallet_address)
    .fetch_all(pool)
    .await?;

    rows.iter().map(|row| row.try_get("tx_hash")).collect()
}

pub async fn delete_seen_txs(pool: &SqlitePool, key: &WatchKey) -> Result<u64, SqlxError> {
    let result =
        sqlx::query("DELETE FROM seen_transactions WHERE chat_id = ? AND wallet_address = ?")
            .bind(key.chat_id)
            .bind(&key.wallet_address)
            .execute(pool)
            .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_database_needs_no_directory() {
        assert!(ensure_database_dir("sqlite::memory:").is_ok());
        assert!(ensure_database_dir("sqlite://:memory:").is_ok());
    }

    #[tokio::test]
    async fn memory_database_shares_one_connection() {
        let pool = connect("sqlite::memory:", 5).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let key = WatchKey::new(1, "0x8894e0a0c962cb723c1976a4421c95949be2d4e3");
        upsert_wallet(&pool, &key, None).await.unwrap();

        // Concurrent queries would hit fresh, unmigrated databases on extra connections
        let lookups = futures::future::join_all((0..5).map(|_| get_chat_wallets(&pool, 1))).await;
        for wallets in lookups {
            assert_eq!(wallets.unwrap().len(), 1);
        }
        assert_eq!(pool.options().get_max_connections(), 1);
    }

    #[test]
    fn recognizes_memory_database_urls() {
        assert!(is_memory_database("sqlite::memory:"));
        assert!(is_memory_database("sqlite://:memory:"));
        assert!(is_memory_database("sqlite://file.db?mode=memory"));
        assert!(!is_memory_database("sqlite://data/bot_data.db?mode=rwc"));
    }

    #[test]
    fn creates_parent_directory_of_database_file() {
        let dir = std::env::temp_dir().join(format!("bsc-watch-bot-{}", std::process::id()));
        let url = format!("sqlite://{}/nested/bot_data.db?mode=rwc", dir.display());

        ensure_database_dir(&url).unwrap();
        assert!(dir.join("nested").is_dir());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
