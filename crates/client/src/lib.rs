//! Client-side session, identity and journal logic for journey.
//!
//! The [`Controller`] owns a [`Session`] (current access key plus the backend
//! client bound to it) and runs the [`IdentityFlow`] and [`EntryRepository`]
//! against it. Rendering lives in the TUI and CLI crates.

pub mod controller;
pub mod entries;
pub mod identity;
pub mod session;
pub mod session_store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use controller::{Controller, Page, Screen, screen_for};
pub use entries::EntryRepository;
pub use identity::{FlowState, IdentityFlow};
pub use session::Session;
pub use session_store::{FileSessionStore, MemorySessionStore, SessionStore};

use journey_api_client::ApiError;
use journey_core::JourneyError;
use serde::Serialize;

pub(crate) fn storage_error(err: ApiError) -> JourneyError {
    JourneyError::storage(err.message())
}

pub(crate) fn to_row<T: Serialize>(value: &T) -> journey_core::Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| JourneyError::storage(format!("encode row: {e}")))
}
