use crate::error::{JourneyError, Result};
use crate::model::AccessKey;

pub const MSG_EMPTY_KEY: &str = "Please enter your key.";
pub const MSG_EMPTY_NAME: &str = "Please enter a name.";

/// Accept a typed sign-in key, rejecting blank input.
pub fn validate_key_input(candidate: &str) -> Result<AccessKey> {
    AccessKey::parse(candidate).ok_or_else(|| JourneyError::validation(MSG_EMPTY_KEY))
}

/// Accept a display name, rejecting blank or whitespace-only input.
///
/// The name is stored as typed; only the emptiness check trims.
pub fn validate_name(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        Err(JourneyError::validation(MSG_EMPTY_NAME))
    } else {
        Ok(name)
    }
}

/// Entry text worth saving. Blank drafts are silently skipped, never an error.
pub fn entry_text(draft: &str) -> Option<&str> {
    if draft.trim().is_empty() {
        None
    } else {
        Some(draft)
    }
}
