//! Morning tech report: recent headlines, an LLM briefing on top, saved as
//! Markdown.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta};
use tracing::{info, warn};

use crate::config::{ReportConfig, ReportFeed};
use crate::llm::{complete_or_error, Completion, CompletionRequest};
use crate::source::{truncate_chars, FeedFetcher};

const SUMMARY_MAX_CHARS: usize = 500;
const PROMPT_ARTICLES: usize = 30;
const HEADLINES_PER_CATEGORY: usize = 8;
const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(120);

/// Headline categories, in report order.
pub const CATEGORIES: [&str; 4] = ["ai", "tech", "research", "funding"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
    pub category: String,
    pub published: Option<NaiveDateTime>,
}

/// Collect entries newer than `cutoff` from every report feed.
///
/// Only the first `per_feed` entries of a feed are looked at.  Entries with
/// no timestamp are kept, since their age is unknown.  A feed that fails is
/// logged and skipped.
pub fn fetch_articles(
    fetcher: &dyn FeedFetcher,
    feeds: &[ReportFeed],
    per_feed: usize,
    cutoff: NaiveDateTime,
) -> Vec<Article> {
    let mut articles = Vec::new();

    for feed in feeds {
        let entries = match fetcher.fetch(&feed.url) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error fetching {}: {e}", feed.name);
                continue;
            }
        };

        for entry in entries.iter().take(per_feed) {
            let published = entry.timestamp();
            if published.is_some_and(|ts| ts <= cutoff) {
                continue;
            }
            articles.push(Article {
                title: entry.title_or_default().to_string(),
                summary: truncate_chars(entry.summary_or_empty(), SUMMARY_MAX_CHARS),
                link: entry.link_or_empty().to_string(),
                source: feed.name.clone(),
                category: feed.category.clone(),
                published,
            });
        }
    }

    articles
}

/// The analyst prompt over the first thirty articles.
pub fn analysis_request(articles: &[Article]) -> CompletionRequest {
    let article_text = articles
        .iter()
        .take(PROMPT_ARTICLES)
        .map(|a| format!("**{}** ({}, {})\n{}", a.title, a.source, a.category, a.summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    let prompt = format!(
        "You are a tech trend analyst. Analyze these recent tech news articles and provide:\n\n\
         1. **Top 5 Signals Today**: The most important developments with brief explanation\n\
         2. **Pattern Watch**: Any patterns emerging that connect to broader tech evolution\n\
         3. **Prediction Update**: Based on these signals, any short-term predictions \
         (next 3-6 months)\n\
         4. **Action Items**: What should a tech professional pay attention to this week\n\n\
         Articles from the last 24 hours:\n\n\
         {article_text}\n\n\
         Provide a concise, actionable morning briefing. Use markdown formatting."
    );

    CompletionRequest::new(prompt)
        .max_tokens(1500)
        .temperature(0.7)
        .timeout(ANALYSIS_TIMEOUT)
}

/// Render the full Markdown report.
pub fn generate_report(articles: &[Article], analysis: &str, now: DateTime<Local>) -> String {
    let mut report = format!(
        "# Morning Tech Report — {date}\n\n\
         **Generated:** {time}  \n\
         **Articles analyzed:** {count}\n\n\
         ---\n\n\
         ## AI Analysis\n\n\
         {analysis}\n\n\
         ---\n\n\
         ## Raw Headlines by Category\n\n\
         ### AI & Machine Learning\n",
        date = now.format("%Y-%m-%d"),
        time = now.format("%H:%M"),
        count = articles.len(),
    );

    for category in CATEGORIES {
        let mut in_category = articles.iter().filter(|a| a.category == category).peekable();
        if in_category.peek().is_none() {
            continue;
        }
        if category != "ai" {
            let _ = write!(report, "\n### {}\n", title_case(category));
        }
        for a in in_category.take(HEADLINES_PER_CATEGORY) {
            let _ = writeln!(report, "- [{}]({}) — {}", a.title, a.link, a.source);
        }
    }

    report.push_str("\n---\n\n*Report generated by daybrief*\n");
    report
}

/// Write `report` to `dir/file_name`, creating `dir` first.
pub fn save_report(report: &str, dir: &Path, file_name: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, report)?;
    info!("Report saved to {}", path.display());
    Ok(path)
}

/// A generated report and what went into it.
#[derive(Debug, Clone)]
pub struct MorningReport {
    pub markdown: String,
    pub article_count: usize,
    pub date: String,
}

impl MorningReport {
    /// Save under both configured directories, returning the paths written.
    pub fn save(&self, config: &ReportConfig) -> io::Result<Vec<PathBuf>> {
        Ok(vec![
            save_report(
                &self.markdown,
                &config.output_dir,
                &format!("{}-morning-report.md", self.date),
            )?,
            save_report(
                &self.markdown,
                &config.downloads_dir,
                &format!("morning-tech-report-{}.md", self.date),
            )?,
        ])
    }
}

/// Fetch, analyse and render.  `None` when no articles were found.
pub fn build(
    fetcher: &dyn FeedFetcher,
    llm: &dyn Completion,
    config: &ReportConfig,
    now: DateTime<Local>,
) -> Option<MorningReport> {
    let cutoff = cutoff_for(now, config.hours_back);
    let articles = fetch_articles(fetcher, &config.feeds, config.per_feed, cutoff);
    info!("Found {} articles", articles.len());
    if articles.is_empty() {
        return None;
    }

    info!("Analyzing with {}", llm.name());
    let analysis = complete_or_error(llm, &analysis_request(&articles));

    Some(MorningReport {
        markdown: generate_report(&articles, &analysis, now),
        article_count: articles.len(),
        date: now.format("%Y-%m-%d").to_string(),
    })
}

/// `now - hours_back` in naive UTC.  A window too large for chrono means no
/// cutoff at all.
fn cutoff_for(now: DateTime<Local>, hours_back: i64) -> NaiveDateTime {
    TimeDelta::try_hours(hours_back)
        .and_then(|back| now.naive_utc().checked_sub_signed(back))
        .unwrap_or_else(|| {
            warn!("{hours_back} hours back is out of range, keeping every article");
            NaiveDateTime::MIN
        })
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
