//! Stateless HTTP request builder and response parser for the lists API.
//!
//! # Design
//! `ListsClient` holds only a `base_url`. Each route is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. List names are percent-encoded into the
//! path, so names with spaces or slashes round-trip.

use std::collections::BTreeMap;

use lists_core::{IndexedItem, ItemUpdate, ListPage, NewItem};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Credentials, Moved, Pages, Registration, Session};

const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone)]
pub struct ListsClient {
    base_url: String,
}

impl ListsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn list_url(&self, list: &str, rest: &str) -> String {
        let list = utf8_percent_encode(list, SEGMENT);
        self.url(&format!("/list/{list}{rest}"))
    }

    fn request(&self, method: HttpMethod, url: String, token: Option<&str>) -> HttpRequest {
        let headers = token
            .map(|token| vec![("authorization".to_string(), format!("Bearer {token}"))])
            .unwrap_or_default();
        HttpRequest {
            method,
            url,
            headers,
            body: None,
        }
    }

    fn json_request<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        url: String,
        token: Option<&str>,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut request = self.request(method, url, token);
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }

    // --- health ---

    pub fn build_health(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.url("/"), None)
    }

    pub fn parse_health(&self, response: HttpResponse) -> Result<String, ApiError> {
        let body: Value = parse_json(&response, 200)?;
        body.get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::DeserializationError("missing 'message'".into()))
    }

    // --- auth ---

    pub fn build_register(&self, input: &Registration) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, self.url("/auth/register"), None, input)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<Session, ApiError> {
        parse_json(&response, 200)
    }

    pub fn build_login(&self, input: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, self.url("/auth/login"), None, input)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<Session, ApiError> {
        parse_json(&response, 200)
    }

    // --- lists ---

    pub fn build_get_lists(&self, token: &str) -> HttpRequest {
        self.request(HttpMethod::Get, self.url("/list"), Some(token))
    }

    pub fn parse_get_lists(&self, response: HttpResponse) -> Result<Pages, ApiError> {
        parse_json(&response, 200)
    }

    /// `page` is 1-based.
    pub fn build_get_list(&self, token: &str, list: &str, page: usize) -> HttpRequest {
        self.request(HttpMethod::Get, self.list_url(list, &format!("/{page}")), Some(token))
    }

    pub fn parse_get_list(&self, response: HttpResponse) -> Result<ListPage, ApiError> {
        single_page(&response, 200)
    }

    pub fn build_create_list(&self, token: &str, list: &str) -> HttpRequest {
        self.request(HttpMethod::Post, self.list_url(list, ""), Some(token))
    }

    pub fn parse_create_list(&self, response: HttpResponse) -> Result<ListPage, ApiError> {
        single_page(&response, 201)
    }

    pub fn build_rename_list(
        &self,
        token: &str,
        list: &str,
        new_name: &str,
    ) -> Result<HttpRequest, ApiError> {
        let body = json!({ "newListName": new_name });
        self.json_request(HttpMethod::Post, self.list_url(list, "/rename"), Some(token), &body)
    }

    pub fn parse_rename_list(&self, response: HttpResponse) -> Result<ListPage, ApiError> {
        single_page(&response, 200)
    }

    pub fn build_clear_list(&self, token: &str, list: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, self.list_url(list, "/update"), Some(token))
    }

    pub fn parse_clear_list(&self, response: HttpResponse) -> Result<ListPage, ApiError> {
        single_page(&response, 200)
    }

    pub fn build_delete_list(&self, token: &str, list: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, self.list_url(list, "/delete"), Some(token))
    }

    pub fn parse_delete_list(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    // --- items ---

    pub fn build_add_item(
        &self,
        token: &str,
        list: &str,
        item: &NewItem,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, self.list_url(list, "/add"), Some(token), item)
    }

    pub fn parse_add_item(&self, response: HttpResponse) -> Result<IndexedItem, ApiError> {
        parse_json(&response, 200)
    }

    pub fn build_update_item(
        &self,
        token: &str,
        list: &str,
        id: usize,
        update: &ItemUpdate,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.list_url(list, &format!("/{id}"));
        self.json_request(HttpMethod::Put, url, Some(token), update)
    }

    /// The page that holds the item after the update.
    pub fn parse_update_item(&self, response: HttpResponse) -> Result<ListPage, ApiError> {
        single_page(&response, 200)
    }

    pub fn build_delete_item(&self, token: &str, list: &str, id: usize) -> HttpRequest {
        self.request(HttpMethod::Delete, self.list_url(list, &format!("/{id}")), Some(token))
    }

    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn build_move_item(
        &self,
        token: &str,
        list: &str,
        id: usize,
        new_list: &str,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.list_url(list, &format!("/move/{id}"));
        let body = json!({ "newList": new_list });
        self.json_request(HttpMethod::Post, url, Some(token), &body)
    }

    pub fn parse_move_item(
        &self,
        response: HttpResponse,
        list: &str,
        new_list: &str,
    ) -> Result<Moved, ApiError> {
        let mut lists: BTreeMap<String, Vec<IndexedItem>> = parse_json(&response, 200)?;
        let mut take = |name: &str| {
            lists.remove(name).ok_or_else(|| {
                ApiError::DeserializationError(format!("response has no '{name}' list"))
            })
        };
        Ok(Moved {
            source: take(list)?,
            target: take(new_list)?,
        })
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    let message = error_message(&response.body);
    Err(match response.status {
        400 => ApiError::Rejected(message),
        401 => ApiError::Unauthorized(message),
        409 => ApiError::Conflict(message),
        status => ApiError::HttpError {
            status,
            body: response.body.clone(),
        },
    })
}

/// The `error` field of a failure body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Unwrap a `{ name: page }` body holding exactly one list.
fn single_page(response: &HttpResponse, expected: u16) -> Result<ListPage, ApiError> {
    let pages: Pages = parse_json(response, expected)?;
    let count = pages.len();
    match pages.into_values().next() {
        Some(page) if count == 1 => Ok(page),
        _ => Err(ApiError::DeserializationError(format!(
            "expected one list, got {count}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "abc.def";

    fn client() -> ListsClient {
        ListsClient::new("http://localhost:5000")
    }

    fn body(req: &HttpRequest) -> Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn build_get_lists_carries_bearer_token() {
        let req = client().build_get_lists(TOKEN);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:5000/list");
        assert_eq!(req.header("Authorization"), Some("Bearer abc.def"));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_register_has_no_token() {
        let input = Registration {
            email: "someemail@gmail.com".into(),
            password: "password123".into(),
            username: "John Doe".into(),
        };
        let req = client().build_register(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:5000/auth/register");
        assert!(req.header("authorization").is_none());
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(body(&req)["username"], "John Doe");
    }

    #[test]
    fn list_names_are_percent_encoded() {
        let req = client().build_get_list(TOKEN, "My School/Work", 2);
        assert_eq!(req.url, "http://localhost:5000/list/My%20School%2FWork/2");
    }

    #[test]
    fn build_add_item_serializes_new_item() {
        let item = NewItem::new("A", 1000).with_deadline(50);
        let req = client().build_add_item(TOKEN, "Main", &item).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:5000/list/Main/add");
        let body = body(&req);
        assert_eq!(body["title"], "A");
        assert_eq!(body["notes"], json!([]));
        assert_eq!(body["created"], 1000);
        assert_eq!(body["deadline"], 50);
        assert!(body.get("reminder").is_none());
    }

    #[test]
    fn build_update_item_omits_absent_fields() {
        let update = ItemUpdate {
            completed: Some(true),
            ..Default::default()
        };
        let req = client().build_update_item(TOKEN, "Main", 3, &update).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:5000/list/Main/3");
        assert_eq!(body(&req), json!({ "completed": true }));
    }

    #[test]
    fn build_move_and_rename_bodies() {
        let req = client().build_move_item(TOKEN, "ListA", 1, "ListB").unwrap();
        assert_eq!(req.url, "http://localhost:5000/list/ListA/move/1");
        assert_eq!(body(&req), json!({ "newList": "ListB" }));

        let req = client().build_rename_list(TOKEN, "School", "Work").unwrap();
        assert_eq!(req.url, "http://localhost:5000/list/School/rename");
        assert_eq!(body(&req), json!({ "newListName": "Work" }));
    }

    #[test]
    fn clear_and_delete_use_distinct_paths() {
        let clear = client().build_clear_list(TOKEN, "School");
        let delete = client().build_delete_list(TOKEN, "School");
        assert_eq!(clear.method, HttpMethod::Delete);
        assert_eq!(clear.url, "http://localhost:5000/list/School/update");
        assert_eq!(delete.url, "http://localhost:5000/list/School/delete");
        let item = client().build_delete_item(TOKEN, "School", 0);
        assert_eq!(item.url, "http://localhost:5000/list/School/0");
    }

    #[test]
    fn parse_get_list_unwraps_single_entry() {
        let response = HttpResponse::new(
            200,
            r#"{"Main":{"items":[{"id":0,"title":"A","notes":[],"created":1000,"completed":false}],"pages":1}}"#,
        );
        let page = client().parse_get_list(response).unwrap();
        assert_eq!(page.pages, 1);
        assert_eq!(page.items[0].id, 0);
        assert_eq!(page.items[0].item.title, "A");
    }

    #[test]
    fn parse_get_list_rejects_several_entries() {
        let response = HttpResponse::new(
            200,
            r#"{"A":{"items":[],"pages":1},"B":{"items":[],"pages":1}}"#,
        );
        let err = client().parse_get_list(response).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_move_item_splits_lists() {
        let response = HttpResponse::new(
            200,
            r#"{"ListA":[],"ListB":[{"id":0,"title":"x1","notes":[],"created":1,"completed":false}]}"#,
        );
        let moved = client().parse_move_item(response, "ListA", "ListB").unwrap();
        assert!(moved.source.is_empty());
        assert_eq!(moved.target[0].item.title, "x1");
    }

    #[test]
    fn error_statuses_map_to_variants() {
        let rejected = HttpResponse::new(400, r#"{"error":"'Food' list does not exist"}"#);
        match client().parse_get_list(rejected).unwrap_err() {
            ApiError::Rejected(message) => assert_eq!(message, "'Food' list does not exist"),
            other => panic!("unexpected error: {other:?}"),
        }

        let unauthorized = HttpResponse::new(401, r#"{"error":"Token has expired"}"#);
        assert!(matches!(
            client().parse_get_lists(unauthorized).unwrap_err(),
            ApiError::Unauthorized(_)
        ));

        let conflict = HttpResponse::new(409, r#"{"error":"retry"}"#);
        assert!(matches!(
            client().parse_delete_item(conflict).unwrap_err(),
            ApiError::Conflict(_)
        ));

        let internal = HttpResponse::new(500, "boom");
        assert!(matches!(
            client().parse_delete_list(internal).unwrap_err(),
            ApiError::HttpError { status: 500, .. }
        ));
    }

    #[test]
    fn create_list_expects_201() {
        let ok = HttpResponse::new(201, r#"{"School":{"items":[],"pages":1}}"#);
        assert!(client().parse_create_list(ok).unwrap().items.is_empty());
        let wrong = HttpResponse::new(200, r#"{"School":{"items":[],"pages":1}}"#);
        assert!(matches!(
            client().parse_create_list(wrong).unwrap_err(),
            ApiError::HttpError { status: 200, .. }
        ));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ListsClient::new("http://localhost:5000/");
        assert_eq!(client.build_health().url, "http://localhost:5000/");
        assert_eq!(client.build_get_lists(TOKEN).url, "http://localhost:5000/list");
    }

    #[test]
    fn parse_bad_json() {
        let response = HttpResponse::new(200, "not json");
        let err = client().parse_get_lists(response).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
