//! Portfolio and trade records.

use std::sync::Arc;

use chrono::Utc;
use common::ServiceError;
use tracing::info;
use uuid::Uuid;
use vault::AddressVault;

use crate::store::{PortfolioRecord, RecordStore, TradeRecord};

/// Fewest tokens a portfolio may hold.
pub const MIN_TOKENS: usize = 2;

/// Most tokens a portfolio may hold.
pub const MAX_TOKENS: usize = 10;

/// Platform fee charged on top of every purchase (1%).
pub const TRADE_FEE_RATE: f64 = 0.01;

/// Fee charged for a purchase of `amount`.
pub fn trade_fee(amount: f64) -> f64 {
    amount * TRADE_FEE_RATE
}

#[derive(Clone)]
pub struct PortfolioService {
    vault: AddressVault,
    store: Arc<dyn RecordStore>,
}

impl PortfolioService {
    pub fn new(vault: AddressVault, store: Arc<dyn RecordStore>) -> Self {
        Self { vault, store }
    }

    /// Create a portfolio owned by `creator_address`.
    ///
    /// Entries are trimmed and blanks dropped; between [`MIN_TOKENS`] and
    /// [`MAX_TOKENS`] must remain.
    pub async fn create(
        &self,
        creator_address: &str,
        tokens: Vec<String>,
    ) -> Result<PortfolioRecord, ServiceError> {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect();
        if !(MIN_TOKENS..=MAX_TOKENS).contains(&tokens.len()) {
            return Err(ServiceError::BadRequest(format!(
                "a portfolio needs between {MIN_TOKENS} and {MAX_TOKENS} token addresses, got {}",
                tokens.len()
            )));
        }

        let record = PortfolioRecord {
            id: format!("portfolio_{}", Uuid::new_v4().simple()),
            creator_key: self.vault.derive_lookup_key(creator_address),
            tokens,
            created_at: Utc::now(),
        };
        let created = self.store.insert_portfolio(record).await?;
        info!(portfolio = %created.id, tokens = created.tokens.len(), "portfolio created");
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<PortfolioRecord, ServiceError> {
        self.store
            .get_portfolio(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("portfolio {id} not found")))
    }

    pub async fn list_all(&self) -> Result<Vec<PortfolioRecord>, ServiceError> {
        Ok(self.store.list_portfolios().await?)
    }

    pub async fn by_creator(
        &self,
        creator_address: &str,
    ) -> Result<Vec<PortfolioRecord>, ServiceError> {
        let key = self.vault.derive_lookup_key(creator_address);
        Ok(self.store.portfolios_by_creator(&key).await?)
    }

    /// Delete a portfolio. Only its creator may do so.
    pub async fn delete(
        &self,
        caller_address: &str,
        id: &str,
    ) -> Result<PortfolioRecord, ServiceError> {
        let portfolio = self.get(id).await?;
        if portfolio.creator_key != self.vault.derive_lookup_key(caller_address) {
            return Err(ServiceError::Forbidden(format!(
                "portfolio {id} belongs to another wallet"
            )));
        }
        let deleted = self.store.delete_portfolio(id).await?;
        info!(portfolio = %deleted.id, "portfolio deleted");
        Ok(deleted)
    }

    /// Record a purchase of `amount` SOL of portfolio `portfolio_id`.
    pub async fn record_trade(
        &self,
        buyer_address: &str,
        portfolio_id: &str,
        amount: f64,
    ) -> Result<TradeRecord, ServiceError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ServiceError::BadRequest(
                "amount must be a positive number".into(),
            ));
        }
        // Existence check up front gives a clean 404 regardless of backend.
        self.get(portfolio_id).await?;

        let trade = TradeRecord {
            id: Uuid::new_v4().to_string(),
            buyer_key: self.vault.derive_lookup_key(buyer_address),
            portfolio_id: portfolio_id.to_owned(),
            amount,
            timestamp: Utc::now(),
        };
        let recorded = self.store.insert_trade(trade).await?;
        info!(portfolio = %recorded.portfolio_id, amount, "trade recorded");
        Ok(recorded)
    }

    /// Trades of `buyer_address`, newest first.
    pub async fn trades(&self, buyer_address: &str) -> Result<Vec<TradeRecord>, ServiceError> {
        let key = self.vault.derive_lookup_key(buyer_address);
        Ok(self.store.trades_by_buyer(&key).await?)
    }
}
