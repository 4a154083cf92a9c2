//! List and item handlers.
//!
//! Every mutating handler loads the account through [`CurrentAccount`], runs
//! exactly one [`ListCollection`](lists_core::ListCollection) operation and
//! persists the result before answering. Responses are keyed by list name.

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use lists_core::{
    validate_array, FieldRule, FieldType, IndexedItem, ItemUpdate, ListPage, NewItem, Schema,
    Vivify, PAGE_SIZE,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{parse_body, parse_number, persist};
use crate::{auth::CurrentAccount, error::AppError, state::AppState};

type Pages = Json<BTreeMap<String, ListPage>>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveBody {
    new_list: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameBody {
    new_list_name: String,
}

fn add_schema(now: i64) -> Schema {
    Schema::new()
        .field("title", FieldRule::new(FieldType::String))
        .field("notes", FieldRule::new(FieldType::Array))
        .field("created", FieldRule::new(FieldType::Integer).default(now))
        .field("deadline", FieldRule::new(FieldType::Integer).optional())
        .field("reminder", FieldRule::new(FieldType::Integer).optional())
}

fn update_schema() -> Schema {
    Schema::new()
        .field("title", FieldRule::new(FieldType::String).optional())
        .field("notes", FieldRule::new(FieldType::Array).optional())
        .field("completed", FieldRule::new(FieldType::Boolean).optional())
        .field("deadline", FieldRule::new(FieldType::Integer).optional())
        .field("reminder", FieldRule::new(FieldType::Integer).optional())
}

/// Validate `body` against `schema` and require every note to be a string.
fn validate_item_body(body: &mut Value, schema: &Schema) -> Result<(), AppError> {
    schema.validate_value(body)?;
    if let Some(Value::Array(notes)) = body.get("notes") {
        validate_array("notes", notes, FieldType::String)?;
    }
    Ok(())
}

fn single(list: String, page: ListPage) -> Pages {
    Json(BTreeMap::from([(list, page)]))
}

pub async fn get_lists(CurrentAccount(account): CurrentAccount) -> Pages {
    Json(account.lists.get_lists())
}

pub async fn get_list(
    CurrentAccount(account): CurrentAccount,
    Path((list, page)): Path<(String, String)>,
) -> Result<Pages, AppError> {
    let page = parse_number(&page, "Page")?;
    let items = account.lists.get_list(&list, page)?;
    debug!(account = %account.email, %list, page, "read list page");
    Ok(single(list, items))
}

pub async fn create_list(
    State(state): State<AppState>,
    CurrentAccount(mut account): CurrentAccount,
    Path(list): Path<String>,
) -> Result<(StatusCode, Pages), AppError> {
    account.lists.create_list(&list)?;
    persist(&state, &mut account).await?;
    info!(account = %account.email, %list, "created list");
    let page = account.lists.get_list(&list, 1)?;
    Ok((StatusCode::CREATED, single(list, page)))
}

pub async fn add_item(
    State(state): State<AppState>,
    CurrentAccount(mut account): CurrentAccount,
    Path(list): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IndexedItem>, AppError> {
    let Json(mut body) = payload?;
    validate_item_body(&mut body, &add_schema(Utc::now().timestamp_millis()))?;
    let new: NewItem = serde_json::from_value(body)?;

    let added = account.lists.add_item(&list, new)?;
    persist(&state, &mut account).await?;
    if added.list == Vivify::Created {
        info!(account = %account.email, %list, "created list on first item");
    }
    debug!(account = %account.email, %list, index = added.index, "added item");

    let item = account.lists.item(&list, added.index)?.clone();
    Ok(Json(IndexedItem {
        id: added.index,
        item,
    }))
}

pub async fn update_item(
    State(state): State<AppState>,
    CurrentAccount(mut account): CurrentAccount,
    Path((list, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Pages, AppError> {
    let index = parse_number(&id, "Item id")?;
    let Json(mut body) = payload?;
    validate_item_body(&mut body, &update_schema())?;
    let update: ItemUpdate = serde_json::from_value(body)?;

    let index = account.lists.update_item(&list, index, update)?;
    persist(&state, &mut account).await?;
    debug!(account = %account.email, %list, index, "updated item");

    let page = account.lists.get_list(&list, index / PAGE_SIZE + 1)?;
    Ok(single(list, page))
}

pub async fn delete_item(
    State(state): State<AppState>,
    CurrentAccount(mut account): CurrentAccount,
    Path((list, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let index = parse_number(&id, "Item id")?;
    account.lists.delete_item(&list, index)?;
    persist(&state, &mut account).await?;
    debug!(account = %account.email, %list, index, "deleted item");
    Ok(StatusCode::OK)
}

pub async fn move_item(
    State(state): State<AppState>,
    CurrentAccount(mut account): CurrentAccount,
    Path((list, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BTreeMap<String, Vec<IndexedItem>>>, AppError> {
    let index = parse_number(&id, "Item id")?;
    let schema = Schema::new().field("newList", FieldRule::new(FieldType::String));
    let MoveBody { new_list } = parse_body(payload, &schema)?;

    let position = account.lists.move_item(&list, index, &new_list)?;
    persist(&state, &mut account).await?;
    debug!(account = %account.email, from = %list, to = %new_list, position, "moved item");

    let source = account.lists.indexed(&list)?;
    let target = account.lists.indexed(&new_list)?;
    Ok(Json(BTreeMap::from([(list, source), (new_list, target)])))
}

pub async fn rename_list(
    State(state): State<AppState>,
    CurrentAccount(mut account): CurrentAccount,
    Path(list): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Pages, AppError> {
    let schema = Schema::new().field("newListName", FieldRule::new(FieldType::String));
    let RenameBody { new_list_name } = parse_body(payload, &schema)?;

    account.lists.rename_list(&list, &new_list_name)?;
    persist(&state, &mut account).await?;
    info!(account = %account.email, from = %list, to = %new_list_name, "renamed list");

    let page = account.lists.get_list(&new_list_name, 1)?;
    Ok(single(new_list_name, page))
}

pub async fn clear_list(
    State(state): State<AppState>,
    CurrentAccount(mut account): CurrentAccount,
    Path(list): Path<String>,
) -> Result<Pages, AppError> {
    account.lists.clear_list(&list)?;
    persist(&state, &mut account).await?;
    info!(account = %account.email, %list, "cleared list");
    let page = account.lists.get_list(&list, 1)?;
    Ok(single(list, page))
}

pub async fn delete_list(
    State(state): State<AppState>,
    CurrentAccount(mut account): CurrentAccount,
    Path(list): Path<String>,
) -> Result<StatusCode, AppError> {
    account.lists.delete_list(&list)?;
    persist(&state, &mut account).await?;
    info!(account = %account.email, %list, "deleted list");
    Ok(StatusCode::OK)
}
