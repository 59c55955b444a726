//! Background job runner for the terminal UI.
//!
//! Fetching feeds, asking an LLM and pulling quotes all block for seconds at
//! a time, so the UI hands them to a dedicated thread and keeps drawing.
//! Jobs go in over one [`mpsc`] channel and results come back over another.
//!
//! Jobs run one at a time, in the order they were sent.

use std::sync::mpsc;
use std::thread;

use chrono::Local;
use rand::Rng;

use crate::aggregate::{get_top_posts, Post};
use crate::config::FeedSource;
use crate::llm::Completion;
use crate::market::{generate_market_report, AssetClass, DateRange, QuoteProvider, Region};
use crate::prompts::Tool;
use crate::source::FeedFetcher;

/// Work requested by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    /// Re-fetch and rank the AI feed.
    Feed,
    /// Run one of the LLM tools on the given input.
    Tool { tool: Tool, input: String },
    /// Build a market report.
    Market {
        range: DateRange,
        asset_class: AssetClass,
        region: Region,
    },
}

/// Results sent from the worker thread back to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerMsg {
    /// Freshly ranked posts.
    Posts(Vec<Post>),
    /// Markdown produced by a tool.
    ToolOutput { tool: Tool, text: String },
    /// Markdown market report.
    Market(String),
}

/// Everything the worker needs to run jobs.
pub struct Services {
    pub fetcher: Box<dyn FeedFetcher>,
    pub llm: Box<dyn Completion>,
    pub quotes: Box<dyn QuoteProvider>,
    pub sources: Vec<FeedSource>,
    pub top: usize,
}

impl Services {
    /// Run one job to completion on the calling thread.
    pub fn run(&self, job: Job, rng: &mut impl Rng) -> WorkerMsg {
        match job {
            Job::Feed => WorkerMsg::Posts(get_top_posts(
                self.fetcher.as_ref(),
                &self.sources,
                self.top,
                None,
            )),
            Job::Tool { tool, input } => WorkerMsg::ToolOutput {
                tool,
                text: tool.run(self.llm.as_ref(), &input, rng),
            },
            Job::Market {
                range,
                asset_class,
                region,
            } => WorkerMsg::Market(generate_market_report(
                self.quotes.as_ref(),
                range,
                asset_class,
                region,
                Local::now(),
            )),
        }
    }
}

/// Spawn the worker thread.
///
/// Returns the job sender and the result receiver.  The thread exits once
/// the job sender is dropped or the result receiver goes away.
pub fn spawn(services: Services) -> (mpsc::Sender<Job>, mpsc::Receiver<WorkerMsg>) {
    let (job_tx, job_rx) = mpsc::channel::<Job>();
    let (msg_tx, msg_rx) = mpsc::channel();

    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        for job in job_rx {
            let msg = services.run(job, &mut rng);
            if msg_tx.send(msg).is_err() {
                return;
            }
        }
    });

    (job_tx, msg_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::{entry, FakeFetcher};
    use crate::error::QuoteError;
    use crate::llm::tests::FakeCompletion;
    use crate::market::PriceHistory;
    use chrono::{DateTime, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    struct NoQuotes;

    impl QuoteProvider for NoQuotes {
        fn history(
            &self,
            ticker: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<PriceHistory, QuoteError> {
            Err(QuoteError::NoData(ticker.to_string()))
        }
    }

    fn services() -> Services {
        let sources = vec![FeedSource::new("r/test", "https://feeds.test/r", "🧪")];
        let fetcher = FakeFetcher::default().with(
            "https://feeds.test/r",
            vec![
                entry("one", Some("1 point")),
                entry("two", Some("2 points")),
                entry("three", Some("3 points")),
            ],
        );
        Services {
            fetcher: Box::new(fetcher),
            llm: Box::new(FakeCompletion::answering("Rewritten.")),
            quotes: Box::new(NoQuotes),
            sources,
            top: 2,
        }
    }

    #[test]
    fn feed_job_returns_top_posts() {
        let msg = services().run(Job::Feed, &mut StdRng::seed_from_u64(1));
        match msg {
            WorkerMsg::Posts(posts) => {
                let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
                assert_eq!(titles, ["three", "two"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tool_job_returns_tagged_output() {
        let job = Job::Tool {
            tool: Tool::EmailTone,
            input: "fix this".to_string(),
        };
        assert_eq!(
            services().run(job, &mut StdRng::seed_from_u64(1)),
            WorkerMsg::ToolOutput {
                tool: Tool::EmailTone,
                text: "Rewritten.".to_string()
            }
        );
    }

    #[test]
    fn market_job_renders_even_without_quotes() {
        let job = Job::Market {
            range: DateRange::OneWeek,
            asset_class: AssetClass::Bonds,
            region: Region::Global,
        };
        match services().run(job, &mut StdRng::seed_from_u64(1)) {
            WorkerMsg::Market(md) => assert!(md.contains("*Unable to fetch index data*")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn spawned_worker_answers_in_order() {
        let (jobs, results) = spawn(services());
        jobs.send(Job::Feed).unwrap();
        jobs.send(Job::Tool {
            tool: Tool::Recipes,
            input: String::new(),
        })
        .unwrap();

        let first = results.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(first, WorkerMsg::Posts(_)));
        let second = results.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            second,
            WorkerMsg::ToolOutput {
                tool: Tool::Recipes,
                text: "Please list your ingredients!".to_string()
            }
        );
    }
}
