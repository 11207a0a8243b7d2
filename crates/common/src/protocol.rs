//! Request and response types exchanged with `folio-svc` clients.
//!
//! All bodies are JSON. The caller's wallet address travels in a request
//! header, never in these bodies, and no response carries a raw or sealed
//! address: users are identified by their lookup key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Request body for `PUT /users/me`.
///
/// A missing or blank `username` resets it to the default; a missing
/// `about` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
}

/// A user profile as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    /// Lookup key (hex SHA-256 of the wallet address).
    pub id: String,
    pub username: String,
    pub about: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Portfolios
// ---------------------------------------------------------------------------

/// Request body for `POST /portfolios`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePortfolioRequest {
    /// Token mint addresses. Blank entries are ignored; 2–10 must remain.
    pub tokens: Vec<String>,
}

/// A portfolio as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioResponse {
    pub id: String,
    /// Lookup key of the creator.
    pub creator_id: String,
    pub tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Trades
// ---------------------------------------------------------------------------

/// Request body for `POST /portfolios/:id/trades`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordTradeRequest {
    /// Amount invested, in SOL. Must be finite and greater than zero.
    pub amount: f64,
}

/// A recorded trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeResponse {
    pub id: String,
    pub portfolio_id: String,
    pub amount: f64,
    /// Platform fee charged on top of `amount`.
    pub fee: f64,
    /// `amount + fee`.
    pub total: f64,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// A favorited portfolio. `portfolio` is `None` when it has since been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub portfolio_id: String,
    pub created_at: DateTime<Utc>,
    pub portfolio: Option<PortfolioResponse>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.public_message())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"`.
    pub status: String,
    /// Crate version of the running binary.
    pub version: String,
}
