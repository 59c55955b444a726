//! Financial market update: index table, top movers and sector performance
//! over a chosen period, rendered as Markdown.
//!
//! Prices come from a [`QuoteProvider`].  A ticker whose lookup fails is
//! logged and left out; the report itself always renders.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use clap::ValueEnum;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::error::QuoteError;

// ---------------------------------------------------------------------------
// Static tables
// ---------------------------------------------------------------------------

const US_INDICES: &[(&str, &str)] = &[
    ("^GSPC", "S&P 500"),
    ("^IXIC", "Nasdaq"),
    ("^DJI", "Dow Jones"),
    ("^VIX", "VIX"),
];

const EUROPE_INDICES: &[(&str, &str)] = &[
    ("^STOXX50E", "Euro Stoxx 50"),
    ("^FTSE", "FTSE 100"),
    ("^GDAXI", "DAX"),
    ("^FCHI", "CAC 40"),
];

const ASIA_PACIFIC_INDICES: &[(&str, &str)] = &[
    ("^N225", "Nikkei 225"),
    ("^HSI", "Hang Seng"),
    ("000001.SS", "Shanghai Composite"),
    ("^AXJO", "ASX 200"),
];

const GLOBAL_INDICES: &[(&str, &str)] = &[
    ("^GSPC", "S&P 500"),
    ("^STOXX50E", "Euro Stoxx 50"),
    ("^N225", "Nikkei 225"),
    ("^VIX", "VIX"),
];

pub const SECTOR_ETFS: &[(&str, &str)] = &[
    ("XLK", "Technology"),
    ("XLF", "Financials"),
    ("XLV", "Healthcare"),
    ("XLE", "Energy"),
    ("XLY", "Consumer Disc."),
    ("XLP", "Consumer Staples"),
    ("XLI", "Industrials"),
    ("XLB", "Materials"),
    ("XLU", "Utilities"),
    ("XLRE", "Real Estate"),
];

const TOP_STOCKS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "BRK-B", "JPM", "V",
];

const TOP_MOVERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DateRange {
    #[value(name = "1d")]
    OneDay,
    #[value(name = "1w")]
    OneWeek,
    #[value(name = "1m")]
    OneMonth,
    #[value(name = "3m")]
    ThreeMonths,
    #[value(name = "1y")]
    OneYear,
}

impl DateRange {
    pub const ALL: [DateRange; 5] = [
        DateRange::OneDay,
        DateRange::OneWeek,
        DateRange::OneMonth,
        DateRange::ThreeMonths,
        DateRange::OneYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DateRange::OneDay => "1 Day",
            DateRange::OneWeek => "1 Week",
            DateRange::OneMonth => "1 Month",
            DateRange::ThreeMonths => "3 Months",
            DateRange::OneYear => "1 Year",
        }
    }

    pub fn days(self) -> i64 {
        match self {
            DateRange::OneDay => 1,
            DateRange::OneWeek => 7,
            DateRange::OneMonth => 30,
            DateRange::ThreeMonths => 90,
            DateRange::OneYear => 365,
        }
    }

    /// `(start, end)` ending at `now`.
    pub fn bounds(self, now: DateTime<Local>) -> (DateTime<Local>, DateTime<Local>) {
        (now - TimeDelta::days(self.days()), now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AssetClass {
    Stocks,
    Bonds,
    Commodities,
    Crypto,
    Forex,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Stocks,
        AssetClass::Bonds,
        AssetClass::Commodities,
        AssetClass::Crypto,
        AssetClass::Forex,
    ];

    /// Index-like tickers of the class.
    pub fn indices(self) -> &'static [&'static str] {
        match self {
            AssetClass::Stocks => &["^GSPC", "^IXIC", "^DJI"],
            // 10Y, 30Y, 5Y treasury yields
            AssetClass::Bonds => &["^TNX", "^TYX", "^FVX"],
            // gold, silver, crude, natural gas
            AssetClass::Commodities => &["GC=F", "SI=F", "CL=F", "NG=F"],
            AssetClass::Crypto => &["BTC-USD", "ETH-USD", "SOL-USD", "XRP-USD", "ADA-USD"],
            AssetClass::Forex => &["EURUSD=X", "GBPUSD=X", "USDJPY=X", "USDCNH=X", "DX-Y.NYB"],
        }
    }

    pub fn etfs(self) -> &'static [&'static str] {
        match self {
            AssetClass::Stocks => &[],
            AssetClass::Bonds => &["TLT", "IEF", "SHY", "AGG", "BND"],
            AssetClass::Commodities => &["GLD", "SLV", "USO", "UNG"],
            AssetClass::Crypto => &["IBIT", "FBTC"],
            AssetClass::Forex => &["UUP", "FXE", "FXY"],
        }
    }

    /// Tickers ranked for top movers.  Stocks rank single names rather than
    /// the indices.
    pub fn mover_tickers(self) -> Vec<&'static str> {
        match self {
            AssetClass::Stocks => TOP_STOCKS.to_vec(),
            _ => self.indices().iter().chain(self.etfs()).copied().collect(),
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetClass::Stocks => "Stocks",
            AssetClass::Bonds => "Bonds",
            AssetClass::Commodities => "Commodities",
            AssetClass::Crypto => "Crypto",
            AssetClass::Forex => "Forex",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Region {
    #[value(name = "us")]
    Us,
    Europe,
    AsiaPacific,
    Global,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Us, Region::Europe, Region::AsiaPacific, Region::Global];

    pub fn indices(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Region::Us => US_INDICES,
            Region::Europe => EUROPE_INDICES,
            Region::AsiaPacific => ASIA_PACIFIC_INDICES,
            Region::Global => GLOBAL_INDICES,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Us => "US",
            Region::Europe => "Europe",
            Region::AsiaPacific => "Asia-Pacific",
            Region::Global => "Global",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Quote provider
// ---------------------------------------------------------------------------

/// Daily price history of one ticker, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    pub closes: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub volumes: Vec<f64>,
}

/// Source of daily price histories.
pub trait QuoteProvider: Send {
    fn history(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceHistory, QuoteError>;
}

/// Reads the public Yahoo Finance chart endpoint.
pub struct YahooChart {
    client: Client,
    base: Url,
}

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Deserialize)]
struct ChartResult {
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    quote: Vec<QuoteSeries>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct QuoteSeries {
    close: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

impl YahooChart {
    const BASE: &'static str = "https://query1.finance.yahoo.com/v8/finance/chart/";

    pub fn new(config: &HttpConfig) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base =
            Url::parse(Self::BASE).map_err(|_| QuoteError::InvalidUrl(Self::BASE.to_string()))?;
        Ok(Self { client, base })
    }

    fn chart_url(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Url, QuoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| QuoteError::InvalidUrl(ticker.to_string()))?
            .pop_if_empty()
            .push(ticker);
        url.query_pairs_mut()
            .append_pair("period1", &start.timestamp().to_string())
            .append_pair("period2", &end.timestamp().to_string())
            .append_pair("interval", "1d");
        Ok(url)
    }
}

impl QuoteProvider for YahooChart {
    fn history(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceHistory, QuoteError> {
        let url = self.chart_url(ticker, start, end)?;
        debug!("Fetching quotes {url}");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status {
                status: status.as_u16(),
                ticker: ticker.to_string(),
            });
        }
        let envelope: ChartEnvelope = response.json()?;
        let series = envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .and_then(|result| result.indicators.quote.into_iter().next())
            .ok_or_else(|| QuoteError::NoData(ticker.to_string()))?;
        Ok(series.into_history())
    }
}

impl QuoteSeries {
    /// Drop the `null` gaps the chart API leaves for non-trading days.
    fn into_history(self) -> PriceHistory {
        let flatten = |v: Vec<Option<f64>>| v.into_iter().flatten().collect();
        PriceHistory {
            closes: flatten(self.close),
            highs: flatten(self.high),
            lows: flatten(self.low),
            volumes: flatten(self.volume),
        }
    }
}

// ---------------------------------------------------------------------------
// Calculations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TickerSummary {
    pub ticker: String,
    pub name: String,
    pub current: f64,
    pub change: f64,
    pub pct_change: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
}

/// Absolute and percent change from the first to the last close.  Zero when
/// there are fewer than two closes or the start price is zero.
pub fn calculate_change(closes: &[f64]) -> (f64, f64) {
    match (closes.first(), closes.last()) {
        (Some(&start), Some(&end)) if closes.len() >= 2 && start != 0.0 => {
            let change = end - start;
            (change, change / start * 100.0)
        }
        _ => (0.0, 0.0),
    }
}

/// Summarise a history; `None` when it has no closes.
pub fn summarize(ticker: &str, history: &PriceHistory) -> Option<TickerSummary> {
    let current = *history.closes.last()?;
    let (change, pct_change) = calculate_change(&history.closes);
    Some(TickerSummary {
        ticker: ticker.to_string(),
        name: String::new(),
        current,
        change,
        pct_change,
        high: history.highs.iter().copied().fold(f64::NAN, f64::max),
        low: history.lows.iter().copied().fold(f64::NAN, f64::min),
        volume: history.volumes.iter().sum(),
    })
}

/// Look up and summarise one ticker, logging failures.
pub fn ticker_data(
    provider: &dyn QuoteProvider,
    ticker: &str,
    start: DateTime<Local>,
    end: DateTime<Local>,
) -> Option<TickerSummary> {
    match provider.history(ticker, start.with_timezone(&Utc), end.with_timezone(&Utc)) {
        Ok(history) => summarize(ticker, &history),
        Err(e) => {
            warn!("Error fetching {ticker}: {e}");
            None
        }
    }
}

fn named(
    provider: &dyn QuoteProvider,
    table: &[(&str, &str)],
    start: DateTime<Local>,
    end: DateTime<Local>,
) -> Vec<TickerSummary> {
    table
        .iter()
        .filter_map(|(ticker, name)| {
            ticker_data(provider, ticker, start, end).map(|mut s| {
                s.name = name.to_string();
                s
            })
        })
        .collect()
}

fn sort_by_change(results: &mut [TickerSummary]) {
    results.sort_by(|a, b| b.pct_change.total_cmp(&a.pct_change));
}

pub fn market_indices(
    provider: &dyn QuoteProvider,
    region: Region,
    start: DateTime<Local>,
    end: DateTime<Local>,
) -> Vec<TickerSummary> {
    named(provider, region.indices(), start, end)
}

/// Sector ETFs, best performer first.
pub fn sector_performance(
    provider: &dyn QuoteProvider,
    start: DateTime<Local>,
    end: DateTime<Local>,
) -> Vec<TickerSummary> {
    let mut results = named(provider, SECTOR_ETFS, start, end);
    sort_by_change(&mut results);
    results
}

/// `(gainers, losers)`: the best `top_n`, and the worst `top_n` worst-first.
/// Losers are only reported when there are more than `top_n` results.
pub fn top_movers(
    provider: &dyn QuoteProvider,
    asset_class: AssetClass,
    start: DateTime<Local>,
    end: DateTime<Local>,
    top_n: usize,
) -> (Vec<TickerSummary>, Vec<TickerSummary>) {
    let mut results: Vec<_> = asset_class
        .mover_tickers()
        .into_iter()
        .filter_map(|ticker| ticker_data(provider, ticker, start, end))
        .collect();
    sort_by_change(&mut results);
    split_movers(results, top_n)
}

fn split_movers(
    sorted: Vec<TickerSummary>,
    top_n: usize,
) -> (Vec<TickerSummary>, Vec<TickerSummary>) {
    let losers = if sorted.len() > top_n {
        sorted[sorted.len() - top_n..].iter().rev().cloned().collect()
    } else {
        Vec::new()
    };
    let gainers = sorted.into_iter().take(top_n).collect();
    (gainers, losers)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

pub fn format_change(pct_change: f64) -> String {
    if pct_change > 0.0 {
        format!("🟢 +{pct_change:.2}%")
    } else if pct_change < 0.0 {
        format!("🔴 {pct_change:.2}%")
    } else {
        format!("⚪ {pct_change:.2}%")
    }
}

/// `$1,234.56` above 100, plain `12.34` otherwise.
pub fn format_price(price: f64) -> String {
    if price > 100.0 {
        format!("${}", with_thousands(price))
    } else {
        format!("{price:.2}")
    }
}

fn with_thousands(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac}")
}

/// Render the market update for the chosen period and focus.
pub fn generate_market_report(
    provider: &dyn QuoteProvider,
    range: DateRange,
    asset_class: AssetClass,
    region: Region,
    now: DateTime<Local>,
) -> String {
    let (start, end) = range.bounds(now);
    let mut parts: Vec<String> = vec![
        "# 📊 Financial Market Update".to_string(),
        format!(
            "**Period:** {} - {} ({})",
            start.format("%b %d"),
            end.format("%b %d, %Y"),
            range.label()
        ),
        format!("**Focus:** {asset_class} | {region}"),
        String::new(),
        "---".to_string(),
        String::new(),
        "## 📈 Market Indices".to_string(),
    ];

    let indices = market_indices(provider, region, start, end);
    if indices.is_empty() {
        parts.push("*Unable to fetch index data*".to_string());
    } else {
        parts.push("| Index | Current | Change |".to_string());
        parts.push("|-------|---------|--------|".to_string());
        for idx in &indices {
            parts.push(format!(
                "| **{}** | {} | {} |",
                idx.name,
                format_price(idx.current),
                format_change(idx.pct_change)
            ));
        }
    }
    parts.push(String::new());

    parts.push("## 🚀 Top Movers".to_string());
    let (gainers, losers) = top_movers(provider, asset_class, start, end, TOP_MOVERS);
    if !gainers.is_empty() {
        parts.push("### 📈 Top Gainers".to_string());
        parts.extend(gainers.iter().map(mover_line));
    }
    parts.push(String::new());
    if !losers.is_empty() {
        parts.push("### 📉 Top Losers".to_string());
        parts.extend(losers.iter().map(mover_line));
    }
    parts.push(String::new());

    if asset_class == AssetClass::Stocks && region == Region::Us {
        parts.push("## 🏭 Sector Performance".to_string());
        let sectors = sector_performance(provider, start, end);
        if !sectors.is_empty() {
            parts.push("| Sector | Change |".to_string());
            parts.push("|--------|--------|".to_string());
            for s in &sectors {
                parts.push(format!("| {} | {} |", s.name, format_change(s.pct_change)));
            }
        }
    }

    parts.push(String::new());
    parts.push("---".to_string());
    parts.push(format!(
        "*Data from Yahoo Finance | Generated {}*",
        now.format("%Y-%m-%d %H:%M")
    ));

    parts.join("\n")
}

fn mover_line(s: &TickerSummary) -> String {
    format!(
        "- **{}**: {} (${:.2})",
        s.ticker,
        format_change(s.pct_change),
        s.current
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    /// Serves a linear close series per ticker; unknown tickers fail.
    #[derive(Default)]
    struct FakeQuotes {
        histories: HashMap<String, PriceHistory>,
    }

    impl FakeQuotes {
        fn with(mut self, ticker: &str, start: f64, end: f64) -> Self {
            self.histories.insert(
                ticker.to_string(),
                PriceHistory {
                    closes: vec![start, (start + end) / 2.0, end],
                    highs: vec![start.max(end) + 1.0],
                    lows: vec![start.min(end) - 1.0],
                    volumes: vec![100.0, 200.0],
                },
            );
            self
        }
    }

    impl QuoteProvider for FakeQuotes {
        fn history(
            &self,
            ticker: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<PriceHistory, QuoteError> {
            self.histories
                .get(ticker)
                .cloned()
                .ok_or_else(|| QuoteError::NoData(ticker.to_string()))
        }
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 16, 0, 0).unwrap()
    }

    fn summary(ticker: &str, pct: f64) -> TickerSummary {
        TickerSummary {
            ticker: ticker.to_string(),
            name: String::new(),
            current: 10.0,
            change: 0.0,
            pct_change: pct,
            high: 0.0,
            low: 0.0,
            volume: 0.0,
        }
    }

    #[test]
    fn change_needs_two_closes_and_nonzero_start() {
        assert_eq!(calculate_change(&[]), (0.0, 0.0));
        assert_eq!(calculate_change(&[5.0]), (0.0, 0.0));
        assert_eq!(calculate_change(&[0.0, 5.0]), (0.0, 0.0));
        assert_eq!(calculate_change(&[100.0, 90.0, 110.0]), (10.0, 10.0));
    }

    #[test]
    fn summary_aggregates_history() {
        let history = PriceHistory {
            closes: vec![50.0, 55.0],
            highs: vec![51.0, 57.0, 56.0],
            lows: vec![49.0, 48.5],
            volumes: vec![10.0, 15.0],
        };
        let s = summarize("AAPL", &history).unwrap();
        assert_eq!(s.current, 55.0);
        assert_eq!(s.change, 5.0);
        assert!((s.pct_change - 10.0).abs() < 1e-9);
        assert_eq!(s.high, 57.0);
        assert_eq!(s.low, 48.5);
        assert_eq!(s.volume, 25.0);
        assert!(summarize("X", &PriceHistory::default()).is_none());
    }

    #[test]
    fn change_formatting() {
        assert_eq!(format_change(1.234), "🟢 +1.23%");
        assert_eq!(format_change(-0.5), "🔴 -0.50%");
        assert_eq!(format_change(0.0), "⚪ 0.00%");
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(5123.456), "$5,123.46");
        assert_eq!(format_price(1234567.0), "$1,234,567.00");
        assert_eq!(format_price(100.5), "$100.50");
        assert_eq!(format_price(99.999), "100.00");
        assert_eq!(format_price(18.2), "18.20");
    }

    #[test]
    fn movers_split() {
        let sorted: Vec<_> = (0..7).map(|i| summary(&format!("T{i}"), 10.0 - i as f64)).collect();
        let (gainers, losers) = split_movers(sorted, 5);
        let g: Vec<_> = gainers.iter().map(|s| s.ticker.as_str()).collect();
        let l: Vec<_> = losers.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(g, ["T0", "T1", "T2", "T3", "T4"]);
        assert_eq!(l, ["T6", "T5", "T4", "T3", "T2"]);
    }

    #[test]
    fn no_losers_when_five_or_fewer() {
        let sorted: Vec<_> = (0..5).map(|i| summary(&format!("T{i}"), i as f64)).collect();
        let (gainers, losers) = split_movers(sorted, 5);
        assert_eq!(gainers.len(), 5);
        assert!(losers.is_empty());
    }

    #[test]
    fn stock_movers_rank_single_names() {
        let quotes = FakeQuotes::default()
            .with("NVDA", 100.0, 130.0)
            .with("AAPL", 200.0, 190.0)
            .with("^GSPC", 5000.0, 9000.0);
        let (start, end) = DateRange::OneWeek.bounds(now());
        let (gainers, losers) = top_movers(&quotes, AssetClass::Stocks, start, end, 5);
        let g: Vec<_> = gainers.iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(g, ["NVDA", "AAPL"], "indices are not movers for stocks");
        assert!(losers.is_empty());
    }

    #[test]
    fn other_classes_rank_indices_and_etfs() {
        assert_eq!(
            AssetClass::Crypto.mover_tickers(),
            ["BTC-USD", "ETH-USD", "SOL-USD", "XRP-USD", "ADA-USD", "IBIT", "FBTC"]
        );
    }

    #[test]
    fn sectors_sorted_best_first() {
        let quotes = FakeQuotes::default()
            .with("XLK", 100.0, 110.0)
            .with("XLE", 100.0, 95.0)
            .with("XLV", 100.0, 120.0);
        let (start, end) = DateRange::OneMonth.bounds(now());
        let names: Vec<_> = sector_performance(&quotes, start, end)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Healthcare", "Technology", "Energy"]);
    }

    #[test]
    fn report_for_us_stocks() {
        let quotes = FakeQuotes::default()
            .with("^GSPC", 5000.0, 5100.0)
            .with("^VIX", 20.0, 18.0)
            .with("NVDA", 100.0, 110.0)
            .with("XLK", 200.0, 210.0);

        let md = generate_market_report(
            &quotes,
            DateRange::OneWeek,
            AssetClass::Stocks,
            Region::Us,
            now(),
        );

        assert!(md.starts_with("# 📊 Financial Market Update\n"));
        assert!(md.contains("**Period:** Mar 07 - Mar 14, 2025 (1 Week)"));
        assert!(md.contains("**Focus:** Stocks | US"));
        assert!(md.contains("| **S&P 500** | $5,100.00 | 🟢 +2.00% |"));
        assert!(md.contains("| **VIX** | 18.00 | 🔴 -10.00% |"));
        assert!(!md.contains("Nasdaq"), "failed tickers are left out");
        assert!(md.contains("- **NVDA**: 🟢 +10.00% ($110.00)"));
        assert!(!md.contains("Top Losers"));
        assert!(md.contains("| Technology | 🟢 +5.00% |"));
        assert!(md.ends_with("*Data from Yahoo Finance | Generated 2025-03-14 16:00*"));
    }

    #[test]
    fn report_without_data_and_without_sectors() {
        let md = generate_market_report(
            &FakeQuotes::default(),
            DateRange::OneDay,
            AssetClass::Crypto,
            Region::Europe,
            now(),
        );
        assert!(md.contains("*Unable to fetch index data*"));
        assert!(md.contains("**Focus:** Crypto | Europe"));
        assert!(!md.contains("Sector Performance"));
        assert!(!md.contains("Top Gainers"));
    }

    #[test]
    fn region_display_and_tables() {
        assert_eq!(Region::AsiaPacific.to_string(), "Asia-Pacific");
        assert_eq!(Region::AsiaPacific.indices().len(), 4);
        assert_eq!(SECTOR_ETFS.len(), 10);
    }

    #[test]
    fn chart_url_carries_ticker_and_period() {
        let yahoo = YahooChart::new(&HttpConfig::default()).unwrap();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 8, 0, 0, 0).unwrap();
        let url = yahoo.chart_url("000001.SS", start, end).unwrap();
        assert_eq!(
            url.as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/000001.SS?period1=1735689600&period2=1736294400&interval=1d"
        );
    }

    #[test]
    fn chart_json_nulls_are_dropped() {
        let envelope: ChartEnvelope = serde_json::from_str(
            r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[1.0,null,2.0],"volume":[5,null]}]}}],"error":null}}"#,
        )
        .unwrap();
        let series = envelope.chart.result.unwrap().remove(0).indicators.quote.remove(0);
        let history = series.into_history();
        assert_eq!(history.closes, vec![1.0, 2.0]);
        assert_eq!(history.volumes, vec![5.0]);
        assert!(history.highs.is_empty());
    }
}
