use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Table holding every registered access key.
pub const KEYS_TABLE: &str = "keys";
/// Table holding one display-name profile per access key.
pub const PROFILES_TABLE: &str = "journals";
/// Table holding journal entries.
pub const ENTRIES_TABLE: &str = "entries";

/// Anonymous bearer credential. Possession is authentication.
///
/// The value is opaque to the client: freshly minted keys are UUID v4
/// strings, but keys typed in by a user are only trimmed, never parsed.
/// Whether a key exists is decided by the key registry alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessKey(String);

impl AccessKey {
    /// Mint a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a user-supplied candidate. Returns `None` when it is blank.
    pub fn parse(candidate: &str) -> Option<Self> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for logs and status lines.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(idx, _)| idx)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row of the key registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    pub user_key: AccessKey,
}

/// Display name attached to an access key. Created once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_key: AccessKey,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_key: AccessKey, name: impl Into<String>) -> Self {
        Self {
            user_key,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Projection used when only the name column is selected.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileName {
    #[serde(default)]
    pub name: Option<String>,
}

/// A single timestamped free-text note owned by an access key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub user_key: AccessKey,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// New entry with a fresh id, stamped now.
    pub fn new(user_key: AccessKey, text: impl Into<String>) -> Self {
        Self::new_at(user_key, text, Utc::now())
    }

    pub fn new_at(user_key: AccessKey, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_key,
            text: text.into(),
            created_at,
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
