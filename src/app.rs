use ratatui::widgets::ListState;

use crate::aggregate::Post;
use crate::market::{AssetClass, DateRange, Region};
use crate::prompts::Tool;
use crate::worker::{Job, WorkerMsg};

/// One page of the tabbed UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Feed,
    Tool(Tool),
    Markets,
}

pub const TABS: [Tab; 7] = [
    Tab::Home,
    Tab::Feed,
    Tab::Tool(Tool::Eli5),
    Tab::Tool(Tool::EmailTone),
    Tab::Tool(Tool::GiftIdeas),
    Tab::Tool(Tool::Recipes),
    Tab::Markets,
];

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Tab::Home => "🏠 Home",
            Tab::Feed => "🤖 AI Feed",
            Tab::Tool(Tool::Eli5) => "🧒 ELI5",
            Tab::Tool(Tool::EmailTone) => "✉️ Email Fixer",
            Tab::Tool(Tool::GiftIdeas) => "🎁 Gift Ideas",
            Tab::Tool(Tool::Recipes) => "🍳 Recipes",
            Tab::Markets => "📊 Markets",
        }
    }

    /// Whether typed characters go into a text input on this tab.
    pub fn takes_text(self) -> bool {
        matches!(self, Tab::Tool(_))
    }
}

/// Input and last answer of one tool tab.
#[derive(Debug, Clone, Default)]
pub struct ToolPane {
    pub input: String,
    pub output: String,
}

pub struct App {
    pub tab_index: usize,
    /// Ranked AI feed, best first.
    pub posts: Vec<Post>,
    /// List selection state for scrolling the feed.
    pub list_state: ListState,
    /// One pane per entry of [`Tool::ALL`].
    pub panes: [ToolPane; 4],
    pub range: DateRange,
    pub asset_class: AssetClass,
    pub region: Region,
    pub market_report: String,
    /// Jobs sent to the worker and not yet answered.
    pub pending: usize,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            tab_index: 0,
            posts: Vec::new(),
            list_state: ListState::default(),
            panes: Default::default(),
            range: DateRange::OneWeek,
            asset_class: AssetClass::Stocks,
            region: Region::Us,
            market_report: String::new(),
            pending: 0,
            quit: false,
            status: "Starting…".into(),
        }
    }

    pub fn tab(&self) -> Tab {
        TABS[self.tab_index]
    }

    pub fn next_tab(&mut self) {
        self.tab_index = (self.tab_index + 1) % TABS.len();
    }

    pub fn previous_tab(&mut self) {
        self.tab_index = (self.tab_index + TABS.len() - 1) % TABS.len();
    }

    pub fn pane(&self, tool: Tool) -> &ToolPane {
        &self.panes[tool_slot(tool)]
    }

    fn pane_mut(&mut self, tool: Tool) -> &mut ToolPane {
        &mut self.panes[tool_slot(tool)]
    }

    // -- worker traffic ------------------------------------------------------

    /// Note that `job` was handed to the worker and pass it through.
    pub fn dispatch(&mut self, job: Job) -> Job {
        self.pending += 1;
        self.status = match &job {
            Job::Feed => "Fetching feeds…".to_string(),
            Job::Tool { tool, .. } => format!("Asking the AI ({})…", tool_name(*tool)),
            Job::Market { .. } => "Fetching market data…".to_string(),
        };
        job
    }

    /// Apply a result from the worker.
    pub fn apply(&mut self, msg: WorkerMsg) {
        self.pending = self.pending.saturating_sub(1);
        match msg {
            WorkerMsg::Posts(posts) => {
                self.status = if posts.is_empty() {
                    "No posts available right now".to_string()
                } else {
                    format!("Fetched {} posts", posts.len())
                };
                self.posts = posts;
                self.list_state
                    .select(if self.posts.is_empty() { None } else { Some(0) });
            }
            WorkerMsg::ToolOutput { tool, text } => {
                self.pane_mut(tool).output = text;
                self.status = format!("{} ready", tool_name(tool));
            }
            WorkerMsg::Market(report) => {
                self.market_report = report;
                self.status = "Market report ready".to_string();
            }
        }
    }

    // -- actions -------------------------------------------------------------

    /// The job the current tab runs on Enter, if any.
    pub fn submit(&mut self) -> Option<Job> {
        let job = match self.tab() {
            Tab::Home => return None,
            Tab::Feed => Job::Feed,
            Tab::Tool(tool) => Job::Tool {
                tool,
                input: self.pane(tool).input.clone(),
            },
            Tab::Markets => Job::Market {
                range: self.range,
                asset_class: self.asset_class,
                region: self.region,
            },
        };
        Some(self.dispatch(job))
    }

    pub fn push_char(&mut self, c: char) {
        if let Tab::Tool(tool) = self.tab() {
            self.pane_mut(tool).input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Tab::Tool(tool) = self.tab() {
            self.pane_mut(tool).input.pop();
        }
    }

    pub fn clear_input(&mut self) {
        if let Tab::Tool(tool) = self.tab() {
            self.pane_mut(tool).input.clear();
        }
    }

    pub fn cycle_range(&mut self) {
        self.range = next_of(&DateRange::ALL, self.range);
    }

    pub fn cycle_asset_class(&mut self) {
        self.asset_class = next_of(&AssetClass::ALL, self.asset_class);
    }

    pub fn cycle_region(&mut self) {
        self.region = next_of(&Region::ALL, self.region);
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.posts.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.posts.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.posts.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.posts.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.posts.is_empty() {
            self.list_state.select(Some(self.posts.len() - 1));
        }
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.list_state.selected().and_then(|i| self.posts.get(i))
    }
}

fn tool_slot(tool: Tool) -> usize {
    Tool::ALL.iter().position(|t| *t == tool).unwrap_or(0)
}

fn tool_name(tool: Tool) -> &'static str {
    match tool {
        Tool::Eli5 => "ELI5",
        Tool::EmailTone => "Email Fixer",
        Tool::GiftIdeas => "Gift Ideas",
        Tool::Recipes => "Recipes",
    }
}

fn next_of<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let i = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(i + 1) % all.len()]
}
