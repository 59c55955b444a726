//! daybrief: daily AI news, LLM helpers and market briefings for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ WorkerMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ worker.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (thread)  │ ◄───────── │ (state)  │          │ (render) │
//! └───────────┘    Job     └──────────┘          └──────────┘
//!                              ▲
//!                              │ handle_key_event()
//!                         ┌──────────┐
//!                         │ input.rs │
//!                         └──────────┘
//! ```
//!
//! * **`source/`**: the `FeedFetcher` trait and the HTTP implementation.
//! * **`aggregate`**: fetch, score and rank posts across sources.
//! * **`render`**: plain-text and markdown feed listings.
//! * **`llm`** / **`prompts`**: completion backends and the four tools.
//! * **`report`**: the morning tech report.
//! * **`market`**: quote history and the market report.
//! * **`worker`**: runs blocking jobs for the UI on a background thread.
//! * **`app`**, **`ui`**, **`input`**: state, rendering and keys of the UI.
//! * **`main`**: parse args, load config, dispatch the subcommand.

mod aggregate;
mod app;
mod config;
mod error;
mod input;
mod llm;
mod market;
mod prompts;
mod render;
mod report;
mod source;
mod ui;
mod worker;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use config::{Backend, Config};
use market::{AssetClass, DateRange, Region, YahooChart};
use prompts::Tool;
use source::HttpFetcher;
use worker::{Job, Services};

#[derive(Parser)]
#[command(name = "daybrief", version, about)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// LLM backend to use, overriding the config file.
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the most popular AI posts across all sources.
    Feed {
        /// Number of posts to show.
        #[arg(long)]
        top: Option<usize>,
        /// Only fetch the named source.  Repeatable.
        #[arg(long = "source", value_name = "NAME")]
        sources: Vec<String>,
        /// Print a Markdown list instead of the plain listing.
        #[arg(long)]
        markdown: bool,
    },
    /// Build the morning tech report.
    Report {
        /// How far back to look for articles.
        #[arg(long)]
        hours: Option<i64>,
        /// Print the report without writing it to disk.
        #[arg(long)]
        no_save: bool,
    },
    /// Explain a complex topic simply.  Picks a random topic when omitted.
    Eli5 { topic: Option<String> },
    /// Print a market update.
    Market {
        #[arg(long, value_enum, default_value = "1w")]
        range: DateRange,
        #[arg(long, value_enum, default_value = "stocks")]
        asset_class: AssetClass,
        #[arg(long, value_enum, default_value = "us")]
        region: Region,
    },
    /// Open the terminal UI.
    Ui,
}

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The UI owns the screen, so log lines would only corrupt it.
    if !matches!(cli.command, Command::Ui) {
        init_tracing(cli.verbose);
    }

    let mut config = Config::load(cli.config.as_deref()).context("loading config")?;
    if let Some(backend) = cli.backend {
        config.llm.backend = backend;
    }

    match cli.command {
        Command::Feed {
            top,
            sources,
            markdown,
        } => run_feed(&config, top, &sources, markdown),
        Command::Report { hours, no_save } => run_report(config, hours, no_save),
        Command::Eli5 { topic } => run_eli5(&config, topic.as_deref()),
        Command::Market {
            range,
            asset_class,
            region,
        } => run_market(&config, range, asset_class, region),
        Command::Ui => run_ui(config),
    }
}

fn run_feed(config: &Config, top: Option<usize>, only: &[String], markdown: bool) -> Result<()> {
    let fetcher = HttpFetcher::new(&config.http)?;
    let only = (!only.is_empty()).then_some(only);
    let posts = aggregate::get_top_posts(
        &fetcher,
        &config.feed.sources,
        top.unwrap_or(config.feed.top),
        only,
    );

    let mut stdout = io::stdout().lock();
    if markdown {
        stdout.write_all(render::markdown_listing(&posts).as_bytes())?;
    } else {
        render::print_feed(&mut stdout, &posts)?;
    }
    stdout.flush()?;
    Ok(())
}

fn run_report(mut config: Config, hours: Option<i64>, no_save: bool) -> Result<()> {
    if let Some(hours) = hours {
        config.report.hours_back = hours;
    }
    let fetcher = HttpFetcher::new(&config.http)?;
    let llm = llm::from_config(&config.llm);

    info!("Fetching tech news from the last {} hours", config.report.hours_back);
    let Some(report) = report::build(&fetcher, llm.as_ref(), &config.report, Local::now()) else {
        println!("No articles found in the last {} hours.", config.report.hours_back);
        return Ok(());
    };

    println!("{}", report.markdown);
    if !no_save {
        let paths = report.save(&config.report).context("saving report")?;
        for path in paths {
            println!("Saved to {}", path.display());
        }
    }
    println!("{} articles analyzed.", report.article_count);
    Ok(())
}

fn run_eli5(config: &Config, topic: Option<&str>) -> Result<()> {
    let llm = llm::from_config(&config.llm);
    let text = Tool::Eli5.run(llm.as_ref(), topic.unwrap_or_default(), &mut rand::thread_rng());
    println!("{text}");
    Ok(())
}

fn run_market(
    config: &Config,
    range: DateRange,
    asset_class: AssetClass,
    region: Region,
) -> Result<()> {
    let quotes = YahooChart::new(&config.http)?;
    let report = market::generate_market_report(&quotes, range, asset_class, region, Local::now());
    println!("{report}");
    Ok(())
}

fn run_ui(config: Config) -> Result<()> {
    install_panic_hook();

    // -- start the background worker -----------------------------------------
    let services = Services {
        fetcher: Box::new(HttpFetcher::new(&config.http)?),
        llm: llm::from_config(&config.llm),
        quotes: Box::new(YahooChart::new(&config.http)?),
        sources: config.feed.sources,
        top: config.feed.top,
    };
    let (jobs, results) = worker::spawn(services);

    // -- terminal setup (RAII, Drop restores on exit or panic) ---------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new();
    jobs.send(app.dispatch(Job::Feed))?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain any results from the worker.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = results.try_recv() {
            app.apply(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if let Some(job) = input::handle_key_event(&mut app, key) {
                    jobs.send(job)?;
                }
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
