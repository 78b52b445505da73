//! Typed client for the PostgREST-style table store behind journey.

pub mod client;
pub mod error;
pub mod query;
pub mod store;

pub use client::{BackendConfig, HttpClientFactory, TableClient, USER_KEY_HEADER};
pub use error::ApiError;
pub use query::{Direction, Filter, Order, Select};
pub use store::{ClientFactory, TableStore};
