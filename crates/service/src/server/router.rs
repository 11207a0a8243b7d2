//! Axum router construction.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/users/me",
            get(handlers::get_user)
                .post(handlers::get_or_create_user)
                .put(handlers::update_profile),
        )
        .route("/users/me/portfolios", get(handlers::my_portfolios))
        .route("/users/me/trades", get(handlers::my_trades))
        .route("/users/me/favorites", get(handlers::my_favorites))
        .route(
            "/users/me/favorites/:portfolio_id",
            put(handlers::add_favorite).delete(handlers::remove_favorite),
        )
        .route(
            "/portfolios",
            post(handlers::create_portfolio).get(handlers::list_portfolios),
        )
        .route(
            "/portfolios/:id",
            get(handlers::get_portfolio).delete(handlers::delete_portfolio),
        )
        .route("/portfolios/:id/trades", post(handlers::record_trade))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}
