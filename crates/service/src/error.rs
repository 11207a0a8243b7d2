//! Mapping from layer errors onto [`ServiceError`].

use common::ServiceError;
use tracing::error;
use vault::VaultError;

use crate::store::StoreError;

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ServiceError::NotFound(format!("{what} not found")),
            StoreError::Conflict(what) => ServiceError::Conflict(format!("{what} already exists")),
            StoreError::Unavailable(reason) => ServiceError::Unavailable(reason),
        }
    }
}

/// Convert a vault failure into a 500, logging it with its fatal/data-level
/// classification. The message never contains address material.
pub fn vault_failure(err: VaultError) -> ServiceError {
    error!(error = %err, fatal = err.is_fatal(), "address vault operation failed");
    ServiceError::Internal(err.to_string())
}
