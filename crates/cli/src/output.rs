use journey_core::JournalEntry;
use journey_core::format::local_timestamp;
use serde::Serialize;

/// Output format for list-style commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Entry as printed by `journey list --json`.
#[derive(Debug, Serialize)]
pub struct EntryOut<'a> {
    pub id: &'a str,
    pub text: &'a str,
    pub created_at: String,
    pub words: usize,
}

impl<'a> From<&'a JournalEntry> for EntryOut<'a> {
    fn from(entry: &'a JournalEntry) -> Self {
        Self {
            id: &entry.id,
            text: &entry.text,
            created_at: entry.created_at.to_rfc3339(),
            words: entry.word_count(),
        }
    }
}

pub fn render_entries(
    entries: &[JournalEntry],
    format: OutputFormat,
    date_format: &str,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let out: Vec<EntryOut> = entries.iter().map(EntryOut::from).collect();
            Ok(serde_json::to_string_pretty(&out)?)
        }
        OutputFormat::Text => Ok(entries_text(entries, date_format)),
    }
}

/// Newest first, one block per entry: header line, then the text indented.
fn entries_text(entries: &[JournalEntry], date_format: &str) -> String {
    if entries.is_empty() {
        return "No entries yet. Write one with `journey write <TEXT>`.".to_string();
    }
    let mut out = String::new();
    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{}  {}\n",
            local_timestamp(&entry.created_at, date_format),
            entry.id
        ));
        for line in entry.text.lines() {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.pop();
    out
}
