pub mod db;
pub mod portfolio_interactor;
pub mod watch_interactor;
