//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Resolve the caller's wallet address from the configured header.
//! - Inject shared application state (`AppState`) into handlers.
//! - Render [`common::ServiceError`] values as JSON error bodies.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod views;
pub mod wallet;
