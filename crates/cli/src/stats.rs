use anyhow::Result;
use chrono::{NaiveDate, Utc};
use journey_api_client::ClientFactory;
use journey_client::Controller;
use journey_core::JournalEntry;
use journey_core::format::local_timestamp;
use journey_core::stats::{current_streak, daily_counts, entry_stats};

use crate::flow::{require_active, require_entries, resume};
use crate::output::OutputFormat;

const WEEK: usize = 7;
const BAR_WIDTH: usize = 20;

/// Run the `stats` command.
pub async fn run_stats<F: ClientFactory>(
    ctl: &mut Controller<F>,
    format: OutputFormat,
    date_format: &str,
) -> Result<()> {
    resume(ctl).await?;
    let (_, name) = require_active(ctl)?;
    require_entries(ctl)?;

    let today = Utc::now().date_naive();
    let out = match format {
        OutputFormat::Json => stats_json(ctl.entries(), today)?,
        OutputFormat::Text => stats_text(&name, ctl.entries(), today, date_format),
    };
    println!("{out}");
    Ok(())
}

fn stats_text(name: &str, entries: &[JournalEntry], today: NaiveDate, date_format: &str) -> String {
    let stats = entry_stats(entries);
    let mut lines = vec![format!("Journal stats for {name}"), "─".repeat(50)];

    if stats.entry_count == 0 {
        lines.push("No entries yet.".to_string());
        return lines.join("\n");
    }

    let streak = current_streak(entries, today);
    lines.push(format!(
        "Entries: {} | Words: {} | Avg: {:.1} words | Longest: {} chars",
        stats.entry_count, stats.word_count, stats.average_words, stats.longest_chars
    ));
    lines.push(format!(
        "Streak: {streak} day{}",
        if streak == 1 { "" } else { "s" }
    ));
    if let (Some(first), Some(last)) = (stats.first_entry_at, stats.last_entry_at) {
        lines.push(format!(
            "First: {} | Latest: {}",
            local_timestamp(&first, date_format),
            local_timestamp(&last, date_format)
        ));
    }
    lines.push(String::new());

    // Last week bar chart
    lines.push("Last 7 days:".to_string());
    let days = daily_counts(entries, WEEK, today);
    let max = days.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
    for (day, count) in days {
        let bar = "█".repeat(count * BAR_WIDTH / max);
        lines.push(format!("  {} {bar} {count}", day.format("%a %m-%d")));
    }
    lines.join("\n")
}

fn stats_json(entries: &[JournalEntry], today: NaiveDate) -> Result<String> {
    let stats = entry_stats(entries);
    let json = serde_json::json!({
        "entry_count": stats.entry_count,
        "word_count": stats.word_count,
        "average_words": stats.average_words,
        "longest_chars": stats.longest_chars,
        "first_entry_at": stats.first_entry_at.map(|t| t.to_rfc3339()),
        "last_entry_at": stats.last_entry_at.map(|t| t.to_rfc3339()),
        "current_streak": current_streak(entries, today),
        "last_7_days": daily_counts(entries, WEEK, today)
            .into_iter()
            .map(|(day, count)| serde_json::json!({"date": day.to_string(), "entries": count}))
            .collect::<Vec<_>>(),
    });
    Ok(serde_json::to_string_pretty(&json)?)
}
