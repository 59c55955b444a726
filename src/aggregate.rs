//! The AI feed: fetch every configured source, score and normalise its
//! entries, then rank everything by score.
//!
//! Sources are fetched one at a time in the order they are configured.  A
//! failing source is logged and contributes nothing; the aggregation as a
//! whole never fails.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::FeedSource;
use crate::source::{truncate_chars, FeedFetcher, RawEntry};

/// Entries considered per source.  Feeds list newest first, so this keeps
/// roughly the latest fifteen.
pub const PER_SOURCE_CAP: usize = 15;
pub const TITLE_MAX_CHARS: usize = 100;
pub const SUMMARY_MAX_CHARS: usize = 300;

const COMMENTS_MARKER: &str = " (Comments)";

// Scores are ASCII digits only: `u64::from_str` rejects other scripts.
static REDDIT_SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*(?:points?|upvotes?)").expect("valid reddit score pattern")
});

static HN_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Points:\s*([0-9]+)").expect("valid hn score pattern"));

/// One ranked item of the AI feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub link: String,
    /// Name of the [`FeedSource`] it came from.
    pub source: String,
    pub icon: String,
    /// `YYYY-MM-DD HH:MM`, or empty when the entry carried no time.
    pub date: String,
    pub score: u64,
    pub summary: String,
}

impl Post {
    /// Normalise one raw entry of `source`.
    pub fn from_entry(entry: &RawEntry, source: &FeedSource) -> Self {
        Self {
            title: clean_title(entry.title_or_default()),
            link: entry.link_or_empty().to_string(),
            source: source.name.clone(),
            icon: source.icon.clone(),
            date: entry.display_date(),
            score: extract_score(entry, &source.name),
            summary: truncate_chars(entry.summary_or_empty(), SUMMARY_MAX_CHARS),
        }
    }
}

/// Which score heuristic applies to a source, decided by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStyle {
    /// `42 points` / `7 upvotes` anywhere in content or summary.
    Reddit,
    /// `Points: 7` in the summary.
    HackerNews,
    /// No score available.
    Unscored,
}

impl ScoreStyle {
    /// Case-insensitive on the name.  `"hn"` is a plain substring match.
    pub fn for_source(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.starts_with("r/") || name.contains("reddit") {
            Self::Reddit
        } else if name.contains("hacker") || name.contains("hn") {
            Self::HackerNews
        } else {
            Self::Unscored
        }
    }
}

/// Scrape a popularity score from `entry`, 0 when nothing matches.
pub fn extract_score(entry: &RawEntry, source_name: &str) -> u64 {
    match ScoreStyle::for_source(source_name) {
        ScoreStyle::Reddit => {
            let text = format!("{}{}", entry.content_or_empty(), entry.summary_or_empty());
            first_number(&REDDIT_SCORE, &text)
        }
        ScoreStyle::HackerNews => first_number(&HN_SCORE, entry.summary_or_empty()),
        ScoreStyle::Unscored => 0,
    }
}

fn first_number(pattern: &Regex, text: &str) -> u64 {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Cap at [`TITLE_MAX_CHARS`], then cut at `" (Comments)"` and trim.
pub fn clean_title(raw: &str) -> String {
    let truncated = truncate_chars(raw, TITLE_MAX_CHARS);
    let kept = match truncated.find(COMMENTS_MARKER) {
        Some(idx) => &truncated[..idx],
        None => truncated.as_str(),
    };
    kept.trim().to_string()
}

/// Fetch, normalise and rank posts from `sources`.
///
/// With `only`, sources whose name is not listed are skipped; listed names
/// that match no source are ignored.  Iteration always follows the order of
/// `sources`, and the final sort is stable, so posts with equal scores keep
/// source order then feed order.
pub fn fetch_feed(
    fetcher: &dyn FeedFetcher,
    sources: &[FeedSource],
    only: Option<&[String]>,
) -> Vec<Post> {
    let mut posts = Vec::new();

    let selected = sources
        .iter()
        .filter(|source| only.map_or(true, |names| names.contains(&source.name)));

    for source in selected {
        match fetcher.fetch(&source.url) {
            Ok(entries) => {
                let before = posts.len();
                posts.extend(
                    entries
                        .iter()
                        .take(PER_SOURCE_CAP)
                        .map(|entry| Post::from_entry(entry, source)),
                );
                debug!("{}: {} posts", source.name, posts.len() - before);
            }
            Err(e) => warn!("Error fetching {}: {e}", source.name),
        }
    }

    // `sort_by` is stable.
    posts.sort_by(|a, b| b.score.cmp(&a.score));
    posts
}

/// The first `n` posts of [`fetch_feed`], or all of them when fewer exist.
pub fn get_top_posts(
    fetcher: &dyn FeedFetcher,
    sources: &[FeedSource],
    n: usize,
    only: Option<&[String]>,
) -> Vec<Post> {
    let mut posts = fetch_feed(fetcher, sources, only);
    posts.truncate(n);
    posts
}
