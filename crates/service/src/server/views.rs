//! Record → response conversions. Sealed addresses never leave this crate.

use common::protocol::{FavoriteResponse, PortfolioResponse, TradeResponse, UserResponse};

use crate::portfolios::trade_fee;
use crate::store::{FavoriteRecord, PortfolioRecord, TradeRecord, UserRecord};

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.lookup_key.to_string(),
            username: user.username,
            about: user.about,
            created_at: user.created_at,
        }
    }
}

impl From<PortfolioRecord> for PortfolioResponse {
    fn from(p: PortfolioRecord) -> Self {
        Self {
            id: p.id,
            creator_id: p.creator_key.to_string(),
            tokens: p.tokens,
            created_at: p.created_at,
        }
    }
}

impl From<TradeRecord> for TradeResponse {
    fn from(t: TradeRecord) -> Self {
        let fee = trade_fee(t.amount);
        Self {
            id: t.id,
            portfolio_id: t.portfolio_id,
            amount: t.amount,
            fee,
            total: t.amount + fee,
            timestamp: t.timestamp,
        }
    }
}

/// A favorite joined with its portfolio, if that still exists.
pub fn favorite_response(
    favorite: FavoriteRecord,
    portfolio: Option<PortfolioRecord>,
) -> FavoriteResponse {
    FavoriteResponse {
        portfolio_id: favorite.portfolio_id,
        created_at: favorite.created_at,
        portfolio: portfolio.map(PortfolioResponse::from),
    }
}
