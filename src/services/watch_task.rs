use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::bsc::TransferFeed;
use crate::entity::{BotError, WatchKey};
use crate::services::notifier::Notifier;
use crate::services::watch_store::WatchStore;
use crate::view::alert_view::format_transfer_alert;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchPhase {
    Baselining,
    Polling,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The wallet is still watched; `notified` alerts were delivered.
    Continue { notified: usize },
    /// The store no longer lists the wallet.
    Unwatched,
}

/// Long-running watcher of one (chat, wallet) pair.
///
/// The task first baselines the feed (everything at or before `started_at`
/// is recorded as seen without alerting), then polls on a fixed interval until
/// its cancellation token fires or the store stops listing the pair.
pub struct WatchTask {
    key: WatchKey,
    started_at: i64,
    poll_interval: Duration,
    store: Arc<dyn WatchStore>,
    feed: Arc<dyn TransferFeed>,
    notifier: Arc<dyn Notifier>,
    cancellation_token: CancellationToken,
}

impl WatchTask {
    pub fn new(
        key: WatchKey,
        started_at: i64,
        poll_interval: Duration,
        store: Arc<dyn WatchStore>,
        feed: Arc<dyn TransferFeed>,
        notifier: Arc<dyn Notifier>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            key,
            started_at,
            poll_interval,
            store,
            feed,
            notifier,
            cancellation_token,
        }
    }

    /// Drive the task through its phases until it stops.
    pub async fn run(self) {
        info!(
            "Watch task for {} started (baseline at {})",
            self.key, self.started_at
        );

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut phase = WatchPhase::Baselining;
        while phase != WatchPhase::Stopped {
            phase = tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    info!("Watch task for {} cancelled", self.key);
                    WatchPhase::Stopped
                }

                next = self.step(phase, &mut ticker) => next,
            };
        }

        info!("Watch task for {} stopped", self.key);
    }

    async fn step(&self, phase: WatchPhase, ticker: &mut Interval) -> WatchPhase {
        match phase {
            WatchPhase::Baselining => {
                match self.baseline().await {
                    Ok(marked) => debug!("Baselined {} transactions for {}", marked, self.key),
                    Err(e) => warn!(
                        "Baseline for {} failed, continuing with a partial baseline: {}",
                        self.key, e
                    ),
                }
                WatchPhase::Polling
            }
            WatchPhase::Polling => {
                ticker.tick().await;
                match self.poll_cycle().await {
                    Ok(PollOutcome::Unwatched) => {
                        info!("Wallet {} is no longer watched, stopping", self.key);
                        WatchPhase::Stopped
                    }
                    Ok(PollOutcome::Continue { notified }) => {
                        if notified > 0 {
                            info!("Sent {} alerts for {}", notified, self.key);
                        }
                        WatchPhase::Polling
                    }
                    Err(e) => {
                        warn!("Poll cycle for {} failed: {}", self.key, e);
                        WatchPhase::Polling
                    }
                }
            }
            WatchPhase::Stopped => WatchPhase::Stopped,
        }
    }

    /// Record every transfer at or before `started_at` as seen.
    pub async fn baseline(&self) -> Result<usize, BotError> {
        let events = self.feed.fetch_transfers(&self.key.wallet_address).await?;

        let known: HashSet<&str> = events
            .iter()
            .filter(|event| event.timestamp <= self.started_at)
            .map(|event| event.tx_hash.as_str())
            .collect();

        for tx_hash in &known {
            self.store.mark_seen(&self.key, tx_hash).await?;
        }

        Ok(known.len())
    }

    /// One fetch-and-evaluate pass.
    ///
    /// Alerts are sent before the hash is marked seen, so a crash in between
    /// can repeat an alert but never drop one.
    pub async fn poll_cycle(&self) -> Result<PollOutcome, BotError> {
        let wallet = match self.store.get_wallet(&self.key).await? {
            Some(wallet) => wallet,
            None => return Ok(PollOutcome::Unwatched),
        };

        let events = self.feed.fetch_transfers(&self.key.wallet_address).await?;
        let mut seen = self.store.seen_hashes(&self.key).await?;
        let mut notified = 0;

        for event in &events {
            if event.timestamp <= self.started_at || seen.contains(&event.tx_hash) {
                continue;
            }
            if self.cancellation_token.is_cancelled() {
                break;
            }

            // A transaction with several transfers shows up once per transfer
            seen.insert(event.tx_hash.clone());

            let text = format_transfer_alert(wallet.display_name(), &self.key.wallet_address, event);
            match self.notifier.notify(self.key.chat_id, &text).await {
                Ok(()) => notified += 1,
                Err(e) => error!(
                    "Failed to send alert for {} ({}): {}",
                    event.tx_hash, self.key, e
                ),
            }

            if let Err(e) = self.store.mark_seen(&self.key, &event.tx_hash).await {
                error!(
                    "Failed to mark {} as seen for {}: {}",
                    event.tx_hash, self.key, e
                );
            }
        }

        Ok(PollOutcome::Continue { notified })
    }
}
