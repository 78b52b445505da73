//! Domain types shared by every journey crate: the anonymous access key,
//! profiles, journal entries, the error taxonomy and client-side stats.

pub mod error;
pub mod format;
pub mod model;
pub mod stats;
pub mod validate;

pub use error::{JourneyError, Result};
pub use model::*;
