//! REST API layer
//!
//! `ApiClient` is the single HTTP choke point: it owns the base URL, the
//! bearer-token injection, and the global 401 handling. The resource
//! modules (`auth`, `users`, `tasks`) are a pure mapping layer, one typed
//! function per endpoint, with no business logic and no retries.

pub mod auth;
pub mod client;
pub mod error;
pub mod tasks;
pub mod users;

pub use client::{ApiClient, ApiEvent};
pub use error::{ApiError, ApiResult};
