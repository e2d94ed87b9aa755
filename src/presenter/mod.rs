pub mod portfolio_presenter;
pub mod watch_presenter;
