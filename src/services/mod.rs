pub mod notifier;
pub mod watch_registry;
pub mod watch_store;
pub mod watch_task;

pub use notifier::{Notifier, TelegramNotifier};
pub use watch_registry::{StopOutcome, WatchOutcome, WatchRegistry};
pub use watch_store::{SqliteWatchStore, WatchStore};
pub use watch_task::WatchTask;
