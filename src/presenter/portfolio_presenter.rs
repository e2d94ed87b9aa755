use crate::bsc::validate_bsc_address;
use crate::entity::BotError;
use crate::interactor::portfolio_interactor::PortfolioInteractor;
use crate::view::portfolio_view::PortfolioView;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait PortfolioPresenter: Send + Sync {
    async fn show_portfolio(&self, wallet_address: &str) -> Result<()>;
}

pub struct PortfolioPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> PortfolioPresenterImpl<I, V>
where
    I: PortfolioInteractor,
    V: PortfolioView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }
}

#[async_trait]
impl<I, V> PortfolioPresenter for PortfolioPresenterImpl<I, V>
where
    I: PortfolioInteractor + Send + Sync,
    V: PortfolioView + Send + Sync,
{
    async fn show_portfolio(&self, wallet_address: &str) -> Result<()> {
        if !validate_bsc_address(wallet_address) {
            return self.view.display_invalid_address(wallet_address.trim()).await;
        }

        let message = self.view.display_loading().await?;

        match self.interactor.get_portfolio(wallet_address).await {
            Ok(portfolio) => {
                self.view.display_portfolio(portfolio, message).await?;
            }
            Err(e) => match e.downcast_ref::<BotError>() {
                Some(BotError::Rpc(_)) => {
                    self.view
                        .display_error("Could not fetch the BNB balance, try again later".to_string(), message)
                        .await?;
                }
                _ => {
                    self.view.display_error(e.to_string(), message).await?;
                }
            },
        }

        Ok(())
    }
}
