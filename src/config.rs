//! Runtime configuration.
//!
//! All tables the briefings work from (feed sources, report feeds, LLM
//! endpoints) live in one [`Config`] value that is built once in `main` and
//! handed down explicitly.  A TOML file can override any section; anything it
//! leaves out falls back to the built-in defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use directories::{ProjectDirs, UserDirs};
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub feed: FeedConfig,
    pub report: ReportConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("daybrief/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

/// A named feed endpoint of the AI feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedSource {
    /// Unique lookup key, also drives the score heuristic.
    pub name: String,
    pub url: String,
    /// Decorative label shown next to each post.
    pub icon: String,
}

impl FeedSource {
    pub fn new(name: &str, url: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            icon: icon.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub top: usize,
    pub sources: Vec<FeedSource>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            top: 15,
            sources: vec![
                FeedSource::new(
                    "r/MachineLearning",
                    "https://www.reddit.com/r/MachineLearning/.rss",
                    "🤖",
                ),
                FeedSource::new("r/artificial", "https://www.reddit.com/r/artificial/.rss", "🧠"),
                FeedSource::new("r/LocalLLaMA", "https://www.reddit.com/r/LocalLLaMA/.rss", "🦙"),
                FeedSource::new(
                    "Hacker News AI",
                    "https://hnrss.org/newest?q=AI+OR+LLM+OR+GPT+OR+machine+learning",
                    "📰",
                ),
                FeedSource::new("Lobsters AI", "https://lobste.rs/t/ai.rss", "🦞"),
                FeedSource::new("DEV.to AI", "https://dev.to/feed/tag/ai", "👩‍💻"),
                FeedSource::new("ArXiv AI", "http://export.arxiv.org/rss/cs.AI", "📄"),
            ],
        }
    }
}

/// A feed read by the morning report, tagged with a headline category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportFeed {
    pub name: String,
    pub url: String,
    pub category: String,
}

impl ReportFeed {
    pub fn new(name: &str, url: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            category: category.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub hours_back: i64,
    pub per_feed: usize,
    pub output_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub feeds: Vec<ReportFeed>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let downloads_dir = UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("Downloads"));

        Self {
            hours_back: 24,
            per_feed: 10,
            output_dir: PathBuf::from("ideas/daily_reports"),
            downloads_dir,
            feeds: vec![
                ReportFeed::new(
                    "MIT Tech Review",
                    "https://www.technologyreview.com/feed/",
                    "tech",
                ),
                ReportFeed::new(
                    "TechCrunch AI",
                    "https://techcrunch.com/category/artificial-intelligence/feed/",
                    "ai",
                ),
                ReportFeed::new(
                    "The Verge AI",
                    "https://www.theverge.com/rss/ai-artificial-intelligence/index.xml",
                    "ai",
                ),
                ReportFeed::new(
                    "Ars Technica",
                    "https://feeds.arstechnica.com/arstechnica/technology-lab",
                    "tech",
                ),
                ReportFeed::new("Hacker News", "https://hnrss.org/frontpage", "tech"),
                ReportFeed::new("arXiv AI", "https://rss.arxiv.org/rss/cs.AI", "research"),
                ReportFeed::new("arXiv LG", "https://rss.arxiv.org/rss/cs.LG", "research"),
                ReportFeed::new("Crunchbase News", "https://news.crunchbase.com/feed/", "funding"),
            ],
        }
    }
}

/// Which completion service the tools talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A local Ollama server.
    Ollama,
    /// A hosted OpenAI-compatible chat-completions endpoint.
    Hosted,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub backend: Backend,
    pub ollama_url: String,
    pub ollama_model: String,
    pub hosted_url: String,
    pub hosted_model: String,
    /// Bearer token for the hosted endpoint.  Usually supplied via `HF_TOKEN`.
    pub hosted_token: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Ollama,
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2".to_string(),
            hosted_url: "https://router.huggingface.co/v1/chat/completions".to_string(),
            hosted_model: "HuggingFaceH4/zephyr-7b-beta".to_string(),
            hosted_token: None,
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit `path` must exist.  Without one, the platform config file
    /// (`~/.config/daybrief/config.toml` on Linux) is used when present,
    /// otherwise the defaults.  Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply `OLLAMA_MODEL`, `OLLAMA_HOST` and `HF_TOKEN` overrides.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(model) = var("OLLAMA_MODEL").filter(|v| !v.is_empty()) {
            self.llm.ollama_model = model;
        }
        if let Some(host) = var("OLLAMA_HOST").filter(|v| !v.is_empty()) {
            self.llm.ollama_url = with_scheme(host);
        }
        if let Some(token) = var("HF_TOKEN").filter(|v| !v.is_empty()) {
            self.llm.hosted_token = Some(token);
        }
    }
}

/// `OLLAMA_HOST` is often just `host:port`.
fn with_scheme(host: String) -> String {
    if host.contains("://") {
        host
    } else {
        format!("http://{host}")
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "daybrief").map(|dirs| dirs.config_dir().join("config.toml"))
}
