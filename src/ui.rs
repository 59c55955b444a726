//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! The layout is three rows: the tab bar, the current tab's page and a
//! one-line status bar.  Markdown produced by the tools is shown as plain
//! wrapped text.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Tab, TABS};
use crate::prompts::Tool;

const HOME_TEXT: &str = "\
🚀 Easy Life with AI

Simple AI tools to make your daily life easier.

🤖 AI Feed: the most popular AI posts from Reddit, Hacker News, Lobsters, DEV.to and ArXiv.
🧒 ELI5: complex concepts explained simply. Leave the topic blank for a surprise.
✉️ Email Fixer: turn awkward or angry emails into professional, polite messages.
🎁 Gift Ideas: thoughtful gift suggestions based on the person's interests and budget.
🍳 Recipes: tell it what's in your fridge, get recipe ideas.
📊 Markets: indices, top movers and sectors over a chosen period.

Press Tab to move between pages.";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [tabs_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_tabs(app, frame, tabs_area);
    match app.tab() {
        Tab::Home => draw_home(frame, main_area),
        Tab::Feed => draw_feed_list(app, frame, main_area),
        Tab::Tool(tool) => draw_tool(app, tool, frame, main_area),
        Tab::Markets => draw_markets(app, frame, main_area),
    }
    draw_status_bar(app, frame, status_area);
}

fn draw_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(t.label())).collect();
    let tabs = Tabs::new(titles)
        .select(app.tab_index)
        .block(Block::default().borders(Borders::ALL).title(" daybrief "))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_home(frame: &mut Frame, area: Rect) {
    let home = Paragraph::new(HOME_TEXT)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(home, area);
}

/// Render the ranked AI feed.
fn draw_feed_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .posts
        .iter()
        .map(|post| {
            let score = if post.score > 0 {
                format!("⬆ {:<5}", post.score)
            } else {
                " ".repeat(7)
            };

            let line = Line::from(vec![
                Span::styled(score, Style::default().fg(Color::Green)),
                Span::raw(format!("{} ", post.icon)),
                Span::styled(&post.title, Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", post.source),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(" "),
                Span::styled(&post.date, Style::default().fg(Color::DarkGray)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let [list_area, link_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(" AI Feed ")
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, list_area, &mut app.list_state);

    let link = app
        .selected_post()
        .map(|p| p.link.as_str())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(Span::styled(link, Style::default().fg(Color::Blue))),
        link_area,
    );
}

fn draw_tool(app: &App, tool: Tool, frame: &mut Frame, area: Rect) {
    let [header_area, input_area, output_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Min(1),
    ])
    .areas(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            tool.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(tool.tagline(), Style::default().fg(Color::DarkGray))),
    ]);
    frame.render_widget(header, header_area);

    let pane = app.pane(tool);
    let input = Paragraph::new(format!("{}▏", pane.input)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", tool.input_label())),
    );
    frame.render_widget(input, input_area);

    draw_markdown(&pane.output, " Result ", frame, output_area);
}

fn draw_markets(app: &App, frame: &mut Frame, area: Rect) {
    let [picker_area, report_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);

    let picker = Line::from(vec![
        Span::raw(" Range "),
        Span::styled(app.range.label(), Style::default().fg(Color::Yellow)),
        Span::raw("   Asset class "),
        Span::styled(app.asset_class.to_string(), Style::default().fg(Color::Yellow)),
        Span::raw("   Region "),
        Span::styled(app.region.to_string(), Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(picker), picker_area);

    draw_markdown(&app.market_report, " Market Update ", frame, report_area);
}

fn draw_markdown(markdown: &str, title: &str, frame: &mut Frame, area: Rect) {
    let body = Paragraph::new(Text::raw(markdown))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.tab() {
        Tab::Home => "Tab: next page  q: quit",
        Tab::Feed => "r: refresh  ↑/↓: scroll  Home/End: jump  q: quit",
        Tab::Tool(_) => "type, Enter: ask  Ctrl-U: clear  Esc: quit",
        Tab::Markets => "d/a/g: range/asset/region  Enter: update  q: quit",
    };

    let mut spans = vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
    ];
    if app.pending > 0 {
        spans.push(Span::styled("⏳ ", Style::default().fg(Color::Magenta)));
    }
    spans.push(Span::styled(
        format!("{} posts", app.posts.len()),
        Style::default().fg(Color::Green),
    ));
    spans.push(Span::raw(format!("  {hints}")));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Post;
    use crate::worker::WorkerMsg;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    fn post(title: &str, score: u64) -> Post {
        Post {
            title: title.to_string(),
            link: format!("https://example.com/{title}"),
            source: "r/test".to_string(),
            icon: "*".to_string(),
            date: "2025-01-01 00:00".to_string(),
            score,
            summary: String::new(),
        }
    }

    #[test]
    fn every_tab_draws_without_panicking() {
        let mut app = App::new();
        for _ in 0..TABS.len() {
            render(&mut app);
            app.next_tab();
        }
    }

    #[test]
    fn feed_tab_lists_posts_and_selected_link() {
        let mut app = App::new();
        app.apply(WorkerMsg::Posts(vec![post("Scaling", 42), post("Quiet", 0)]));
        app.next_tab();

        let text = render(&mut app);
        assert!(text.contains("Scaling"));
        assert!(text.contains("[r/test]"));
        assert!(text.contains("https://example.com/Scaling"));
        assert!(text.contains("2 posts"), "status bar should show post count");
    }

    #[test]
    fn tool_tab_shows_input_and_output() {
        let mut app = App::new();
        app.tab_index = 2;
        app.push_char('G');
        app.push_char('D');
        app.push_char('P');
        app.apply(WorkerMsg::ToolOutput {
            tool: Tool::Eli5,
            text: "Imagine a lemonade stand".to_string(),
        });

        let text = render(&mut app);
        assert!(text.contains("GDP"));
        assert!(text.contains("Imagine a lemonade stand"));
    }

    #[test]
    fn markets_tab_shows_selection() {
        let mut app = App::new();
        app.tab_index = TABS.len() - 1;
        app.cycle_region();
        let text = render(&mut app);
        assert!(text.contains("1 Week"));
        assert!(text.contains("Europe"));
    }
}
