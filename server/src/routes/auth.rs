use axum::{extract::rejection::JsonRejection, extract::State, Json};
use lists_core::{normalize_email, Account, FieldRule, FieldType, Schema};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::parse_body;
use crate::{auth::IssuedToken, error::AppError, state::AppState, store::StoreError};

#[derive(Deserialize)]
struct RegisterBody {
    email: String,
    password: String,
    username: String,
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

fn credentials() -> Schema {
    Schema::new()
        .field("email", FieldRule::new(FieldType::String))
        .field("password", FieldRule::new(FieldType::String))
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IssuedToken>, AppError> {
    let schema = credentials().field("username", FieldRule::new(FieldType::String));
    let body: RegisterBody = parse_body(payload, &schema)?;

    let account = Account::register(&body.email, &body.username, &body.password, &state.hasher)?;
    state.store.insert(&account).await?;
    info!(account = %account.email, "registered account");

    Ok(Json(state.signer.issue(&account.email)?))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IssuedToken>, AppError> {
    let body: LoginBody = parse_body(payload, &credentials())?;

    let account = match state.store.load(normalize_email(&body.email)).await {
        Ok(account) => account,
        Err(StoreError::NotFound(_)) => return Err(AppError::UnknownAccount),
        Err(err) => return Err(err.into()),
    };
    if !account.authenticate(&body.password, &state.hasher) {
        info!(account = %account.email, "rejected login");
        return Err(AppError::WrongPassword);
    }

    Ok(Json(state.signer.issue(&account.email)?))
}
