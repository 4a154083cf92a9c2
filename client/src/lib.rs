//! Synchronous API client core for the lists service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network. The caller executes the actual HTTP round-trip.
//!
//! # Design
//! - `ListsClient` holds only `base_url`. The bearer token is an argument of
//!   every authenticated `build_*` call, so one client serves many accounts.
//! - Each route is split into `build_*` (produces request) and `parse_*`
//!   (consumes response).
//! - Item and page DTOs come from `lists-core`. Auth DTOs are defined here
//!   independently from the server crate; integration tests catch drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::ListsClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{Credentials, Moved, Pages, Registration, Session};
