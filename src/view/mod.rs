pub mod alert_view;
pub mod portfolio_view;
pub mod watch_view;
