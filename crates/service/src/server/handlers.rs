//! Axum request handlers for all service endpoints.
//!
//! User-scoped handlers take a [`CallerWallet`]; the address it carries is
//! handed straight to the service layer and is never logged or echoed back.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use common::{
    protocol::{
        CreatePortfolioRequest, ErrorResponse, FavoriteResponse, HealthResponse,
        PortfolioResponse, RecordTradeRequest, TradeResponse, UpdateProfileRequest, UserResponse,
    },
    ServiceError,
};

use super::{error::ApiError, state::AppState, views::favorite_response, wallet::CallerWallet};
use crate::users::UserLookupResult;

type ApiResult<T> = Result<T, ApiError>;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// `GET /health`: liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// `GET /users/me`: the caller's profile, 404 if never created.
pub async fn get_user(
    State(state): State<AppState>,
    CallerWallet(address): CallerWallet,
) -> ApiResult<Json<UserResponse>> {
    match state.users.lookup(&address).await? {
        UserLookupResult::Found(user) => Ok(Json(user.into())),
        UserLookupResult::NotFound => {
            Err(ServiceError::NotFound("no profile for this wallet".into()).into())
        }
    }
}

/// `POST /users/me`: fetch the caller's profile, creating it on first use.
pub async fn get_or_create_user(
    State(state): State<AppState>,
    CallerWallet(address): CallerWallet,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users.get_or_create(&address).await?;
    Ok(Json(user.into()))
}

/// `PUT /users/me`: update username and about text.
pub async fn update_profile(
    State(state): State<AppState>,
    CallerWallet(address): CallerWallet,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .update_profile(&address, req.username, req.about)
        .await?;
    Ok(Json(user.into()))
}

/// `GET /users/me/portfolios`: portfolios created by the caller.
pub async fn my_portfolios(
    State(state): State<AppState>,
    CallerWallet(address): CallerWallet,
) -> ApiResult<Json<Vec<PortfolioResponse>>> {
    let rows = state.portfolios.by_creator(&address).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// `GET /users/me/trades`: the caller's purchases, newest first.
pub async fn my_trades(
    State(state): State<AppState>,
    CallerWallet(address): CallerWallet,
) -> ApiResult<Json<Vec<TradeResponse>>> {
    let rows = state.portfolios.trades(&address).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// `GET /users/me/favorites`: the caller's favorites, newest first.
pub async fn my_favorites(
    State(state): State<AppState>,
    CallerWallet(address): CallerWallet,
) -> ApiResult<Json<Vec<FavoriteResponse>>> {
    let rows = state.users.favorites(&address).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(fav, portfolio)| favorite_response(fav, portfolio))
            .collect(),
    ))
}

/// `PUT /users/me/favorites/:portfolio_id`
pub async fn add_favorite(
    State(state): State<AppState>,
    CallerWallet(address): CallerWallet,
    Path(portfolio_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let (favorite, portfolio) = state.users.add_favorite(&address, &portfolio_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(favorite_response(favorite, Some(portfolio))),
    ))
}

/// `DELETE /users/me/favorites/:portfolio_id`
pub async fn remove_favorite(
    State(state): State<AppState>,
    CallerWallet(address): CallerWallet,
    Path(portfolio_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.users.remove_favorite(&address, &portfolio_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Portfolios & trades
// ---------------------------------------------------------------------------

/// `POST /portfolios`: create a portfolio owned by the caller.
pub async fn create_portfolio(
    State(state): State<AppState>,
    CallerWallet(address): CallerWallet,
    Json(req): Json<CreatePortfolioRequest>,
) -> ApiResult<impl IntoResponse> {
    let portfolio = state.portfolios.create(&address, req.tokens).await?;
    Ok((StatusCode::CREATED, Json(PortfolioResponse::from(portfolio))))
}

/// `GET /portfolios`: every portfolio, newest first.
pub async fn list_portfolios(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PortfolioResponse>>> {
    let rows = state.portfolios.list_all().await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// `GET /portfolios/:id`
pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PortfolioResponse>> {
    Ok(Json(state.portfolios.get(&id).await?.into()))
}

/// `DELETE /portfolios/:id`: creator only.
pub async fn delete_portfolio(
    State(state): State<AppState>,
    CallerWallet(address): CallerWallet,
    Path(id): Path<String>,
) -> ApiResult<Json<PortfolioResponse>> {
    Ok(Json(state.portfolios.delete(&address, &id).await?.into()))
}

/// `POST /portfolios/:id/trades`: record a purchase by the caller.
pub async fn record_trade(
    State(state): State<AppState>,
    CallerWallet(address): CallerWallet,
    Path(id): Path<String>,
    Json(req): Json<RecordTradeRequest>,
) -> ApiResult<impl IntoResponse> {
    let trade = state
        .portfolios
        .record_trade(&address, &id, req.amount)
        .await?;
    Ok((StatusCode::CREATED, Json(TradeResponse::from(trade))))
}
