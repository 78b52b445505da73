use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::model::JournalEntry;

/// Aggregate figures over a set of journal entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryStats {
    pub entry_count: usize,
    pub word_count: usize,
    pub average_words: f64,
    pub longest_chars: usize,
    pub first_entry_at: Option<DateTime<Utc>>,
    pub last_entry_at: Option<DateTime<Utc>>,
}

/// Compute [`EntryStats`] for the slice, in any order.
pub fn entry_stats(entries: &[JournalEntry]) -> EntryStats {
    let mut stats = EntryStats::default();
    for entry in entries {
        stats.entry_count += 1;
        stats.word_count += entry.word_count();
        stats.longest_chars = stats.longest_chars.max(entry.text.chars().count());
        stats.first_entry_at = Some(match stats.first_entry_at {
            Some(first) => first.min(entry.created_at),
            None => entry.created_at,
        });
        stats.last_entry_at = Some(match stats.last_entry_at {
            Some(last) => last.max(entry.created_at),
            None => entry.created_at,
        });
    }
    if stats.entry_count > 0 {
        stats.average_words = stats.word_count as f64 / stats.entry_count as f64;
    }
    stats
}

/// Entries per UTC day for the `days` days ending at `today`, oldest first.
/// Days without entries are present with a zero count.
pub fn daily_counts(
    entries: &[JournalEntry],
    days: usize,
    today: NaiveDate,
) -> Vec<(NaiveDate, usize)> {
    let mut counts: Vec<(NaiveDate, usize)> = (0..days)
        .rev()
        .map(|offset| (today - Duration::days(offset as i64), 0))
        .collect();
    for entry in entries {
        let day = entry.created_at.date_naive();
        if let Some(slot) = counts.iter_mut().find(|(d, _)| *d == day) {
            slot.1 += 1;
        }
    }
    counts
}

/// Consecutive days with at least one entry, ending today.
///
/// A streak that ended yesterday still counts while today is empty, so the
/// number does not drop to zero first thing in the morning.
pub fn current_streak(entries: &[JournalEntry], today: NaiveDate) -> u32 {
    let mut days: Vec<NaiveDate> = entries.iter().map(|e| e.created_at.date_naive()).collect();
    days.sort_unstable();
    days.dedup();

    let has = |day: NaiveDate| days.binary_search(&day).is_ok();
    let mut cursor = if has(today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while has(cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccessKey;
    use chrono::TimeZone;

    fn entry_on(day: u32, hour: u32, text: &str) -> JournalEntry {
        JournalEntry::new_at(
            AccessKey::parse("owner").unwrap(),
            text,
            Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap(),
        )
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn test_entry_stats_empty() {
        assert_eq!(entry_stats(&[]), EntryStats::default());
    }

    #[test]
    fn test_entry_stats_multiple() {
        let entries = vec![
            entry_on(5, 9, "three words here"),
            entry_on(2, 9, "one"),
            entry_on(4, 9, "a b c d e"),
        ];
        let stats = entry_stats(&entries);
        assert_eq!(stats.entry_count, 3);
        assert_eq!(stats.word_count, 9);
        assert!((stats.average_words - 3.0).abs() < f64::EPSILON);
        assert_eq!(stats.longest_chars, 16);
        assert_eq!(stats.first_entry_at, Some(entries[1].created_at));
        assert_eq!(stats.last_entry_at, Some(entries[0].created_at));
    }

    #[test]
    fn test_daily_counts_zero_fills() {
        let entries = vec![
            entry_on(10, 8, "a"),
            entry_on(10, 20, "b"),
            entry_on(8, 8, "c"),
            entry_on(1, 8, "outside window"),
        ];
        let counts = daily_counts(&entries, 4, date(10));
        assert_eq!(
            counts,
            vec![(date(7), 0), (date(8), 1), (date(9), 0), (date(10), 2)]
        );
    }

    #[test]
    fn test_streak_counts_back_from_today() {
        let entries = vec![entry_on(10, 8, "a"), entry_on(9, 8, "b"), entry_on(7, 8, "c")];
        assert_eq!(current_streak(&entries, date(10)), 2);
    }

    #[test]
    fn test_streak_survives_empty_today() {
        let entries = vec![entry_on(9, 8, "a"), entry_on(8, 8, "b")];
        assert_eq!(current_streak(&entries, date(10)), 2);
        assert_eq!(current_streak(&entries, date(11)), 0);
    }
}
