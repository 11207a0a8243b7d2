//! Record persistence: users, portfolios, trades, favorites.
//!
//! [`RecordStore`] is the boundary to the relational backend. It speaks in
//! lookup keys only; no method accepts or returns a raw wallet address.
//! [`MemoryStore`] is the in-process implementation used by the binary and
//! the tests.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use vault::{LookupKey, SealedAddress};

/// Username given to freshly created or unnamed users.
pub const DEFAULT_USERNAME: &str = "NewUser";

/// Errors produced by a [`RecordStore`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No row matched the key.
    #[error("{0} not found")]
    NotFound(String),

    /// The insert would violate a unique constraint.
    #[error("{0} already exists")]
    Conflict(String),

    /// The backend could not be reached.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Row of the `users` table.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub lookup_key: LookupKey,
    pub sealed_address: SealedAddress,
    pub username: String,
    pub about: String,
    pub created_at: DateTime<Utc>,
}

/// Columns of a user row that a profile update may change. `None` leaves
/// the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub about: Option<String>,
}

/// Row of the `portfolios` table.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioRecord {
    pub id: String,
    pub creator_key: LookupKey,
    pub tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Row of the `trades` table.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub id: String,
    pub buyer_key: LookupKey,
    pub portfolio_id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// Row of the `favorites` table. `(user_key, portfolio_id)` is unique.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteRecord {
    pub user_key: LookupKey,
    pub portfolio_id: String,
    pub created_at: DateTime<Utc>,
}

/// Table-like access to the relational backend.
///
/// List methods return rows newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_user(&self, key: &LookupKey) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a user. Fails with [`StoreError::Conflict`] if the lookup key
    /// is already present.
    async fn insert_user(&self, user: UserRecord) -> Result<UserRecord, StoreError>;

    async fn update_user(
        &self,
        key: &LookupKey,
        patch: ProfilePatch,
    ) -> Result<UserRecord, StoreError>;

    async fn insert_portfolio(
        &self,
        portfolio: PortfolioRecord,
    ) -> Result<PortfolioRecord, StoreError>;

    async fn get_portfolio(&self, id: &str) -> Result<Option<PortfolioRecord>, StoreError>;

    async fn list_portfolios(&self) -> Result<Vec<PortfolioRecord>, StoreError>;

    async fn portfolios_by_creator(
        &self,
        key: &LookupKey,
    ) -> Result<Vec<PortfolioRecord>, StoreError>;

    async fn delete_portfolio(&self, id: &str) -> Result<PortfolioRecord, StoreError>;

    async fn insert_trade(&self, trade: TradeRecord) -> Result<TradeRecord, StoreError>;

    async fn trades_by_buyer(&self, key: &LookupKey) -> Result<Vec<TradeRecord>, StoreError>;

    async fn insert_favorite(&self, favorite: FavoriteRecord)
        -> Result<FavoriteRecord, StoreError>;

    async fn delete_favorite(
        &self,
        key: &LookupKey,
        portfolio_id: &str,
    ) -> Result<FavoriteRecord, StoreError>;

    async fn favorites_by_user(&self, key: &LookupKey)
        -> Result<Vec<FavoriteRecord>, StoreError>;
}
