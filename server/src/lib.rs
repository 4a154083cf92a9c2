//! REST backend for named todo lists.
//!
//! # Overview
//! Accounts register and log in under `/auth`, then manage their lists under
//! `/list` with a bearer token. Each request loads one account document,
//! applies a single `lists_core` operation and writes the lists back.
//!
//! # Design
//! - `AppState` carries the document store behind the `AccountStore` trait,
//!   so the in-memory store used by tests and the binary can be swapped out.
//! - Writes carry the version the account was loaded at; a concurrent write
//!   in between turns into `409 Conflict` instead of a lost update.
//! - Every error leaves the server as `{ "error": "..." }`.

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

pub use auth::IssuedToken;
pub use config::Config;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
