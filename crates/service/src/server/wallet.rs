//! Extraction of the caller's wallet address from the request headers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use common::ServiceError;

use super::{error::ApiError, state::AppState};

/// The caller's wallet address, taken from the configured header.
///
/// Deliberately not `Debug`/`Display`: the raw address must not reach logs.
pub struct CallerWallet(pub String);

#[async_trait]
impl FromRequestParts<AppState> for CallerWallet {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let header = state.wallet_header_name.as_str();
        let value = parts
            .headers
            .get(header)
            .ok_or_else(|| ServiceError::BadRequest(format!("missing {header} header")))?;
        let address = value
            .to_str()
            .map_err(|_| {
                ServiceError::BadRequest(format!("{header} header contains non-ASCII characters"))
            })?
            .trim();
        if address.is_empty() {
            return Err(ServiceError::BadRequest(format!("{header} header is empty")).into());
        }
        Ok(Self(address.to_owned()))
    }
}
