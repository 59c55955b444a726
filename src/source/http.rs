//! HTTP feed fetcher.
//!
//! Downloads a feed with a blocking [`reqwest`] client and parses it with
//! [`feed_rs`], which understands RSS 0.9x/1.0/2.0, Atom and JSON Feed.
//! Reddit serves Atom and most of the other sources serve RSS 2.0, so one
//! parser covers every configured source.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::{FeedFetcher, RawEntry};
use crate::config::HttpConfig;
use crate::error::FetchError;

/// Fetches feeds over HTTP.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the configured user agent and timeout.
    ///
    /// The timeout is the only bound on a hanging source: the aggregator
    /// waits for each fetch in turn.
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl FeedFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FetchError> {
        debug!("Fetching feed {url}");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.bytes()?;
        let feed = feed_rs::parser::parse(body.as_ref())?;
        Ok(entries_from_feed(feed))
    }
}

/// Convert an already-parsed feed into [`RawEntry`] values, keeping feed
/// order.
///
/// An entry without a summary gets its content body as the summary, so
/// content-only Atom feeds still carry text downstream.
///
/// Pure (no I/O), so tests can exercise the mapping without the network.
pub fn entries_from_feed(feed: feed_rs::model::Feed) -> Vec<RawEntry> {
    feed.entries
        .into_iter()
        .map(|entry| {
            let content = entry.content.and_then(|c| c.body);
            RawEntry {
                title: entry.title.map(|t| t.content),
                link: entry.links.into_iter().next().map(|l| l.href),
                summary: entry.summary.map(|s| s.content).or_else(|| content.clone()),
                content,
                published: entry.published.map(|dt| dt.naive_utc()),
                updated: entry.updated.map(|dt| dt.naive_utc()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Post;
    use crate::config::FeedSource;

    fn parse(xml: &str) -> Vec<RawEntry> {
        let feed = feed_rs::parser::parse(xml.as_bytes()).unwrap();
        entries_from_feed(feed)
    }

    #[test]
    fn rss_items_map_to_entries() {
        let entries = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Hacker News: Newest</title>
    <link>https://news.ycombinator.com/</link>
    <description>Hacker News RSS</description>
    <item>
      <title>Show HN: A tiny LLM</title>
      <link>https://example.com/1</link>
      <guid>https://example.com/1</guid>
      <pubDate>Mon, 01 Jan 2024 10:30:00 +0000</pubDate>
      <description>Points: 12</description>
    </item>
    <item>
      <title>Second</title>
      <link>https://example.com/2</link>
    </item>
  </channel>
</rss>"#,
        );

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title.as_deref(), Some("Show HN: A tiny LLM"));
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/1"));
        assert_eq!(entries[0].summary.as_deref(), Some("Points: 12"));
        assert_eq!(entries[0].display_date(), "2024-01-01 10:30");

        assert_eq!(entries[1].title.as_deref(), Some("Second"));
        assert!(entries[1].summary.is_none());
        assert_eq!(entries[1].display_date(), "");
    }

    #[test]
    fn atom_entries_carry_content_and_updated() {
        let entries = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:reddit</id>
  <title>MachineLearning</title>
  <updated>2024-05-01T08:00:00+00:00</updated>
  <entry>
    <id>t3_abc</id>
    <title>[D] Scaling laws revisited</title>
    <link href="https://www.reddit.com/r/MachineLearning/comments/abc/"/>
    <updated>2024-05-01T07:15:00+00:00</updated>
    <content type="html">submitted by someone 42 points</content>
  </entry>
</feed>"#,
        );

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.title.as_deref(), Some("[D] Scaling laws revisited"));
        assert_eq!(
            entry.link.as_deref(),
            Some("https://www.reddit.com/r/MachineLearning/comments/abc/")
        );
        assert!(entry.content_or_empty().contains("42 points"));
        assert_eq!(entry.summary_or_empty(), "submitted by someone 42 points");
        assert!(entry.published.is_none());
        assert_eq!(entry.display_date(), "2024-05-01 07:15");
    }

    #[test]
    fn content_only_entry_keeps_text_through_normalisation() {
        let entries = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:reddit</id>
  <title>LocalLLaMA</title>
  <updated>2024-05-01T08:00:00+00:00</updated>
  <entry>
    <id>t3_def</id>
    <title>New 8B model</title>
    <link href="https://www.reddit.com/r/LocalLLaMA/comments/def/"/>
    <updated>2024-05-01T07:15:00+00:00</updated>
    <content type="html">Benchmarks inside. 42 points</content>
  </entry>
</feed>"#,
        );

        let source = FeedSource::new("r/LocalLLaMA", "https://example.com/r", "🦙");
        let post = Post::from_entry(&entries[0], &source);
        assert_eq!(post.score, 42);
        assert_eq!(post.summary, "Benchmarks inside. 42 points");
    }

    #[test]
    fn explicit_summary_wins_over_content() {
        let entries = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:x</id>
  <title>X</title>
  <updated>2024-05-01T08:00:00+00:00</updated>
  <entry>
    <id>e1</id>
    <title>Both</title>
    <updated>2024-05-01T07:15:00+00:00</updated>
    <summary>short</summary>
    <content type="html">long body</content>
  </entry>
</feed>"#,
        );

        assert_eq!(entries[0].summary.as_deref(), Some("short"));
        assert_eq!(entries[0].content.as_deref(), Some("long body"));
    }

    #[test]
    fn fetcher_builds_from_default_config() {
        assert!(HttpFetcher::new(&HttpConfig::default()).is_ok());
    }
}
