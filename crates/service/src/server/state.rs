//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use vault::AddressVault;

use crate::portfolios::PortfolioService;
use crate::store::RecordStore;
use crate::users::UserDirectory;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-backed) so that Axum can clone the
/// state for each request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    pub users: UserDirectory,
    pub portfolios: PortfolioService,
    /// Name of the HTTP header carrying the caller's wallet address.
    pub wallet_header_name: Arc<String>,
}

impl AppState {
    /// Create a new [`AppState`] over one vault and one record store.
    pub fn new(
        vault: AddressVault,
        store: Arc<dyn RecordStore>,
        wallet_header_name: String,
    ) -> Self {
        Self {
            users: UserDirectory::new(vault.clone(), Arc::clone(&store)),
            portfolios: PortfolioService::new(vault, store),
            wallet_header_name: Arc::new(wallet_header_name),
        }
    }
}

#[cfg(test)]
impl Default for AppState {
    /// Empty in-memory store and the development key.
    fn default() -> Self {
        let vault = AddressVault::new(&vault::SymmetricKey::dev_fallback())
            .expect("dev key is 32 bytes");
        Self::new(
            vault,
            Arc::new(crate::store::MemoryStore::new()),
            "X-Wallet-Address".into(),
        )
    }
}
