//! User records keyed by pseudonymised wallet address.
//!
//! Every entry point takes the caller's raw wallet address, derives its
//! lookup key through the [`AddressVault`], and talks to the store with the
//! key only. The sealed copy of the address is written once, when the user
//! row is first created.

use std::sync::Arc;

use chrono::Utc;
use common::ServiceError;
use tracing::{debug, info};
use vault::{AddressVault, LookupKey};

use crate::error::vault_failure;
use crate::store::{
    FavoriteRecord, PortfolioRecord, ProfilePatch, RecordStore, StoreError, UserRecord,
    DEFAULT_USERNAME,
};

/// Longest accepted username, in characters.
pub const MAX_USERNAME_LEN: usize = 32;

/// Longest accepted `about` text, in characters.
pub const MAX_ABOUT_LEN: usize = 280;

/// Outcome of looking a wallet up in the `users` table.
#[derive(Debug, Clone, PartialEq)]
pub enum UserLookupResult {
    Found(UserRecord),
    NotFound,
}

/// User-facing operations on the `users` and `favorites` tables.
#[derive(Clone)]
pub struct UserDirectory {
    vault: AddressVault,
    store: Arc<dyn RecordStore>,
}

impl UserDirectory {
    pub fn new(vault: AddressVault, store: Arc<dyn RecordStore>) -> Self {
        Self { vault, store }
    }

    /// Find the user for `address` without creating it.
    pub async fn lookup(&self, address: &str) -> Result<UserLookupResult, ServiceError> {
        let key = self.vault.derive_lookup_key(address);
        self.lookup_key(&key).await
    }

    async fn lookup_key(&self, key: &LookupKey) -> Result<UserLookupResult, ServiceError> {
        Ok(match self.store.find_user(key).await? {
            Some(user) => UserLookupResult::Found(user),
            None => UserLookupResult::NotFound,
        })
    }

    /// Return the user for `address`, creating it on first sight.
    ///
    /// A user found with an empty username gets the default name persisted.
    pub async fn get_or_create(&self, address: &str) -> Result<UserRecord, ServiceError> {
        let key = self.vault.derive_lookup_key(address);
        match self.lookup_key(&key).await? {
            UserLookupResult::NotFound => self.create(address, key).await,
            UserLookupResult::Found(user) if user.username.is_empty() => {
                debug!(user = key.short(), "assigning default username");
                let patch = ProfilePatch {
                    username: Some(DEFAULT_USERNAME.into()),
                    about: None,
                };
                Ok(self.store.update_user(&key, patch).await?)
            }
            UserLookupResult::Found(user) => Ok(user),
        }
    }

    async fn create(&self, address: &str, key: LookupKey) -> Result<UserRecord, ServiceError> {
        let sealed_address = self.vault.seal_address(address).map_err(vault_failure)?;
        let record = UserRecord {
            lookup_key: key.clone(),
            sealed_address,
            username: DEFAULT_USERNAME.into(),
            about: String::new(),
            created_at: Utc::now(),
        };

        match self.store.insert_user(record).await {
            Ok(user) => {
                info!(user = key.short(), "user created");
                Ok(user)
            }
            // Lost a race with a concurrent first request for the same wallet.
            Err(StoreError::Conflict(_)) => match self.lookup_key(&key).await? {
                UserLookupResult::Found(user) => Ok(user),
                UserLookupResult::NotFound => Err(ServiceError::Internal(
                    "user insert conflicted but no row is visible".into(),
                )),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Update username and about text.
    ///
    /// A missing or blank username is reset to the default; a missing
    /// `about` is cleared.
    pub async fn update_profile(
        &self,
        address: &str,
        username: Option<String>,
        about: Option<String>,
    ) -> Result<UserRecord, ServiceError> {
        let username = match username.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => DEFAULT_USERNAME.to_owned(),
        };
        let about = about.unwrap_or_default();

        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(ServiceError::BadRequest(format!(
                "username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }
        if about.chars().count() > MAX_ABOUT_LEN {
            return Err(ServiceError::BadRequest(format!(
                "about must be at most {MAX_ABOUT_LEN} characters"
            )));
        }

        let key = self.vault.derive_lookup_key(address);
        let patch = ProfilePatch {
            username: Some(username),
            about: Some(about),
        };
        Ok(self.store.update_user(&key, patch).await?)
    }

    /// Mark `portfolio_id` as a favorite of `address`.
    ///
    /// Returns the new favorite together with the portfolio it points at.
    pub async fn add_favorite(
        &self,
        address: &str,
        portfolio_id: &str,
    ) -> Result<(FavoriteRecord, PortfolioRecord), ServiceError> {
        let portfolio = self
            .store
            .get_portfolio(portfolio_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("portfolio {portfolio_id} not found")))?;
        let favorite = FavoriteRecord {
            user_key: self.vault.derive_lookup_key(address),
            portfolio_id: portfolio_id.to_owned(),
            created_at: Utc::now(),
        };
        let favorite = self.store.insert_favorite(favorite).await?;
        Ok((favorite, portfolio))
    }

    pub async fn remove_favorite(
        &self,
        address: &str,
        portfolio_id: &str,
    ) -> Result<FavoriteRecord, ServiceError> {
        let key = self.vault.derive_lookup_key(address);
        Ok(self.store.delete_favorite(&key, portfolio_id).await?)
    }

    /// Favorites of `address`, newest first, each with its portfolio if it
    /// still exists.
    pub async fn favorites(
        &self,
        address: &str,
    ) -> Result<Vec<(FavoriteRecord, Option<PortfolioRecord>)>, ServiceError> {
        let key = self.vault.derive_lookup_key(address);
        let favorites = self.store.favorites_by_user(&key).await?;

        let mut out = Vec::with_capacity(favorites.len());
        for favorite in favorites {
            let portfolio = self.store.get_portfolio(&favorite.portfolio_id).await?;
            out.push((favorite, portfolio));
        }
        Ok(out)
    }
}
