//! The untyped entry shape handed back by a feed fetch.
//!
//! Feed providers disagree on which fields they fill in, so every field of
//! [`RawEntry`] is optional and every accessor falls back to a default.  The
//! aggregator and the morning report only ever read entries through these
//! accessors.

use chrono::NaiveDateTime;

/// One entry of a fetched feed, before any normalisation.
///
/// Timestamps are wall-clock values with no zone attached; they are
/// formatted as-is and never converted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    /// Full body, for feeds that ship one separately from the summary.
    pub content: Option<String>,
    pub published: Option<NaiveDateTime>,
    pub updated: Option<NaiveDateTime>,
}

impl RawEntry {
    /// Title, or `"No title"` when the entry has none.
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("No title")
    }

    pub fn link_or_empty(&self) -> &str {
        self.link.as_deref().unwrap_or_default()
    }

    pub fn summary_or_empty(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }

    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Published time, falling back to the updated time.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.published.or(self.updated)
    }

    /// [`timestamp`](Self::timestamp) as `YYYY-MM-DD HH:MM`, or `""`.
    pub fn display_date(&self) -> String {
        self.timestamp()
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}

/// First `max` characters of `text`.  Counts chars, not bytes, so multi-byte
/// titles are never split mid-codepoint.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 42)
            .unwrap()
    }

    #[test]
    fn empty_entry_uses_defaults() {
        let entry = RawEntry::default();
        assert_eq!(entry.title_or_default(), "No title");
        assert_eq!(entry.link_or_empty(), "");
        assert_eq!(entry.summary_or_empty(), "");
        assert_eq!(entry.content_or_empty(), "");
        assert_eq!(entry.display_date(), "");
    }

    #[test]
    fn published_wins_over_updated() {
        let entry = RawEntry {
            published: Some(at(2025, 3, 4, 5, 6)),
            updated: Some(at(2026, 1, 1, 0, 0)),
            ..Default::default()
        };
        assert_eq!(entry.display_date(), "2025-03-04 05:06");
    }

    #[test]
    fn updated_is_used_when_published_missing() {
        let entry = RawEntry {
            updated: Some(at(2024, 12, 31, 23, 59)),
            ..Default::default()
        };
        assert_eq!(entry.display_date(), "2024-12-31 23:59");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("🦀🦀🦀", 2), "🦀🦀");
    }
}
