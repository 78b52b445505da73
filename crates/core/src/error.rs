use thiserror::Error;

/// Everything a journal operation can surface to the user.
///
/// None of these are fatal: the caller shows the message and lets the user
/// retry the action that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum JourneyError {
    /// Rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),

    /// Sign-in with a key the registry does not know.
    #[error("Key not found.")]
    KeyNotFound,

    /// A backend insert, select or delete failed.
    #[error("{0}")]
    Storage(String),

    /// The local session file could not be read or written.
    #[error("session store: {0}")]
    SessionStore(String),
}

impl JourneyError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Message shown to the user, with `context` prefixed to backend failures.
    pub fn user_message(&self, context: &str) -> String {
        match self {
            Self::Storage(msg) if !context.is_empty() => format!("{context}: {msg}"),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JourneyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_messages_take_context() {
        let err = JourneyError::storage("duplicate key");
        assert_eq!(
            err.user_message("Key creation error"),
            "Key creation error: duplicate key"
        );
        assert_eq!(err.user_message(""), "duplicate key");
    }

    #[test]
    fn validation_and_missing_key_ignore_context() {
        assert_eq!(
            JourneyError::validation("Please enter a name.").user_message("Failed to save name"),
            "Please enter a name."
        );
        assert_eq!(
            JourneyError::KeyNotFound.user_message("ignored"),
            "Key not found."
        );
    }
}
