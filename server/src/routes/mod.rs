//! HTTP surface: path layout, body parsing and the load-mutate-persist step
//! shared by every list handler.

use axum::{
    extract::rejection::JsonRejection,
    routing::{delete, get, post},
    Json, Router,
};
use lists_core::{Account, Schema};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::warn;

use crate::{
    error::AppError,
    state::AppState,
    store::{AccountUpdate, StoreError},
};

pub mod auth;
pub mod lists;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/list", get(lists::get_lists))
        .route("/list/{list}", post(lists::create_list))
        .route("/list/{list}/add", post(lists::add_item))
        .route("/list/{list}/rename", post(lists::rename_list))
        .route("/list/{list}/move/{id}", post(lists::move_item))
        .route("/list/{list}/update", delete(lists::clear_list))
        .route("/list/{list}/delete", delete(lists::delete_list))
        .route(
            "/list/{list}/{id}",
            get(lists::get_list)
                .put(lists::update_item)
                .delete(lists::delete_item),
        )
}

async fn health() -> Json<Value> {
    Json(json!({ "message": "HI" }))
}

/// Validate a JSON body against `schema`, then deserialize it.
fn parse_body<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>,
    schema: &Schema,
) -> Result<T, AppError> {
    let Json(mut body) = payload?;
    schema.validate_value(&mut body)?;
    Ok(serde_json::from_value(body)?)
}

/// Parse a position or page number taken from the path.
fn parse_number(raw: &str, what: &str) -> Result<usize, AppError> {
    raw.parse()
        .map_err(|_| AppError::MalformedPayload(format!("{what} is not a number")))
}

/// Write the account's lists back, guarded by the version it was loaded at.
async fn persist(state: &AppState, account: &mut Account) -> Result<(), AppError> {
    let update = AccountUpdate::lists(account.lists.clone());
    match state
        .store
        .apply_partial_update(&account.email, account.version, update)
        .await
    {
        Ok(version) => {
            account.version = version;
            Ok(())
        }
        Err(err @ StoreError::VersionConflict { .. }) => {
            warn!(account = %account.email, error = %err, "concurrent write rejected");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
