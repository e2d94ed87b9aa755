use crate::bsc::{validate_bsc_address, BalanceService, PriceService, TransferFeed};
use crate::entity::{
    BotError, Portfolio, TokenBalance, TradeSummary, TransferDirection, TransferEvent,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Number of token lines shown in a portfolio
pub const MAX_PORTFOLIO_TOKENS: usize = 10;

#[async_trait]
pub trait PortfolioInteractor: Send + Sync {
    async fn get_portfolio(&self, wallet_address: &str) -> Result<Portfolio>;
}

pub struct PortfolioInteractorImpl {
    balance_service: Arc<dyn BalanceService>,
    transfer_feed: Arc<dyn TransferFeed>,
    price_service: Arc<dyn PriceService>,
}

impl PortfolioInteractorImpl {
    pub fn new(
        balance_service: Arc<dyn BalanceService>,
        transfer_feed: Arc<dyn TransferFeed>,
        price_service: Arc<dyn PriceService>,
    ) -> Self {
        Self {
            balance_service,
            transfer_feed,
            price_service,
        }
    }
}

#[async_trait]
impl PortfolioInteractor for PortfolioInteractorImpl {
    async fn get_portfolio(&self, wallet_address: &str) -> Result<Portfolio> {
        if !validate_bsc_address(wallet_address) {
            return Err(BotError::InvalidAddress(wallet_address.trim().to_string()).into());
        }
        let wallet_address = wallet_address.trim().to_lowercase();

        info!("Building portfolio for {}", wallet_address);

        let bnb_balance = self
            .balance_service
            .get_bnb_balance(&wallet_address)
            .await
            .map_err(|e| BotError::Rpc(e.to_string()))?;

        // A missing price only hides the USD value
        let bnb_price_usd = match self.price_service.get_bnb_price().await {
            Ok(price) => price,
            Err(e) => {
                warn!("Failed to fetch BNB price: {}", e);
                0.0
            }
        };

        // Without a history the portfolio still shows the BNB balance
        let transfers = match self.transfer_feed.fetch_transfers(&wallet_address).await {
            Ok(transfers) => transfers,
            Err(e) => {
                warn!("Failed to fetch transfers of {}: {}", wallet_address, e);
                Vec::new()
            }
        };

        let (last_buy, last_sell) = find_last_trades(&wallet_address, &transfers);

        Ok(Portfolio {
            tokens: aggregate_token_balances(&wallet_address, &transfers),
            wallet_address,
            bnb_balance,
            bnb_price_usd,
            last_buy,
            last_sell,
        })
    }
}

/// Net token holdings derived from the transfer history.
///
/// Incoming transfers add and outgoing transfers subtract. Only positive
/// balances are kept, BNB-named tokens are skipped, and tokens keep the order
/// in which the (newest first) feed first mentions them.
pub fn aggregate_token_balances(
    wallet_address: &str,
    transfers: &[TransferEvent],
) -> Vec<TokenBalance> {
    let mut balances: Vec<TokenBalance> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for transfer in transfers {
        let amount = match transfer.direction(wallet_address) {
            TransferDirection::Incoming => transfer.normalized_amount(),
            TransferDirection::Outgoing => -transfer.normalized_amount(),
        };

        let contract = transfer.token_contract_address.to_lowercase();
        match index.get(&contract) {
            Some(&i) => balances[i].amount += amount,
            None => {
                index.insert(contract.clone(), balances.len());
                balances.push(TokenBalance {
                    symbol: transfer.token_symbol.clone(),
                    amount,
                    contract_address: contract,
                });
            }
        }
    }

    balances
        .into_iter()
        .filter(|token| token.amount > 0.0 && !token.symbol.eq_ignore_ascii_case("BNB"))
        .take(MAX_PORTFOLIO_TOKENS)
        .collect()
}

/// Most recent incoming and outgoing transfer of a newest-first feed.
pub fn find_last_trades(
    wallet_address: &str,
    transfers: &[TransferEvent],
) -> (Option<TradeSummary>, Option<TradeSummary>) {
    let mut last_buy = None;
    let mut last_sell = None;

    for transfer in transfers {
        let slot = match transfer.direction(wallet_address) {
            TransferDirection::Incoming => &mut last_buy,
            TransferDirection::Outgoing => &mut last_sell,
        };

        if slot.is_none() {
            *slot = Some(TradeSummary {
                token_symbol: transfer.token_symbol.clone(),
                amount: transfer.normalized_amount(),
                tx_hash: transfer.tx_hash.clone(),
                contract_address: transfer.token_contract_address.clone(),
                timestamp: Utc
                    .timestamp_opt(transfer.timestamp, 0)
                    .single()
                    .unwrap_or_default(),
            });
        }

        if last_buy.is_some() && last_sell.is_some() {
            break;
        }
    }

    (last_buy, last_sell)
}
