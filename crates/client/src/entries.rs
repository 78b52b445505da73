use journey_api_client::{Filter, Select, TableStore};
use journey_core::validate::entry_text;
use journey_core::{AccessKey, ENTRIES_TABLE, JournalEntry, JourneyError, Result};
use tracing::{debug, warn};

use crate::{storage_error, to_row};

/// CRUD over the `entries` table for one backend client.
///
/// Nothing is mutated locally: callers reload with [`EntryRepository::list`]
/// after every successful write.
pub struct EntryRepository<'a, C: TableStore> {
    client: &'a C,
}

impl<'a, C: TableStore> EntryRepository<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// All entries owned by `owner`, newest first.
    pub async fn list(&self, owner: &AccessKey) -> Result<Vec<JournalEntry>> {
        let rows = self
            .client
            .select(
                ENTRIES_TABLE,
                &Select::all()
                    .eq("user_key", owner.as_str())
                    .order_desc("created_at"),
            )
            .await
            .map_err(storage_error)?;

        let entries = rows
            .into_iter()
            .map(serde_json::from_value::<JournalEntry>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| JourneyError::storage(format!("unexpected entry row: {e}")))?;
        debug!(owner = owner.short(), count = entries.len(), "entries loaded");
        Ok(entries)
    }

    /// Insert a new entry. Blank text is skipped without error and returns
    /// `Ok(None)`; the text is otherwise stored exactly as typed.
    pub async fn create(&self, owner: &AccessKey, text: &str) -> Result<Option<JournalEntry>> {
        let Some(text) = entry_text(text) else {
            return Ok(None);
        };
        let entry = JournalEntry::new(owner.clone(), text);
        self.client
            .insert(ENTRIES_TABLE, to_row(&entry)?)
            .await
            .map_err(storage_error)?;
        debug!(owner = owner.short(), id = %entry.id, "entry saved");
        Ok(Some(entry))
    }

    /// Delete by id. Ids the caller does not own are left alone by the
    /// backend, which the client reports as success.
    pub async fn delete(&self, entry_id: &str) -> Result<()> {
        if entry_id.trim().is_empty() {
            return Err(JourneyError::validation("No entry selected."));
        }
        self.client
            .delete(ENTRIES_TABLE, &[Filter::eq("id", entry_id)])
            .await
            .map_err(|e| {
                warn!(id = entry_id, error = %e, "delete failed");
                storage_error(e)
            })
    }
}
