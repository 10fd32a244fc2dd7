#![deny(warnings)]

//! Core domain models and input contracts for KDP portfolio forecasting.
//!
//! This crate defines the serializable types shared by the projection
//! pipeline (books, calendar period keys, period records, summaries) and
//! validation helpers that portfolio loaders run before handing books to
//! the simulator. The simulator itself never validates.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Opaque unique identifier for a book in a portfolio.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub String);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Market genre of a book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Fiction,
    NonFiction,
    Business,
}

impl Genre {
    /// Wire name, e.g. `non_fiction`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "fiction",
            Genre::NonFiction => "non_fiction",
            Genre::Business => "business",
        }
    }
}

/// A self-published title with its static attributes and ad strategy.
///
/// Field names serialize in camelCase to match the portfolio store's
/// records. Optional fields default to the values a freshly opened book
/// form starts with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier.
    pub id: BookId,
    /// Display title; not used by the model.
    #[serde(default)]
    pub title: String,
    /// Release date. Day-of-month drives first-period gating.
    pub launch_date: NaiveDate,
    /// Content quality score, 1..=10.
    pub quality: u8,
    /// Reviews at launch; drives the social proof multiplier.
    #[serde(default)]
    pub initial_reviews: u32,
    pub genre: Genre,
    /// Manuscript length in words; drives subscription payout per read.
    pub word_count: u32,
    #[serde(default)]
    pub is_series: bool,
    /// Read-through value per unit sold when `is_series` is set.
    #[serde(default, rename = "seriesLTV")]
    pub series_ltv: Decimal,
    /// Use `price_launch` / `price_normal` instead of quality tiers.
    #[serde(default)]
    pub manual_pricing: bool,
    #[serde(default = "default_price_launch")]
    pub price_launch: Decimal,
    #[serde(default = "default_price_normal")]
    pub price_normal: Decimal,
    /// Monthly Amazon Ads spend, used when `auto_optimize` is false.
    #[serde(default)]
    pub amazon_ad_budget: Decimal,
    /// Monthly Facebook Ads spend, used when `auto_optimize` is false.
    #[serde(default)]
    pub facebook_ad_budget: Decimal,
    /// Let the budget optimizer pick spend each period.
    #[serde(default)]
    pub auto_optimize: bool,
}

fn default_price_launch() -> Decimal {
    Decimal::new(299, 2)
}

fn default_price_normal() -> Decimal {
    Decimal::new(799, 2)
}

/// Half of a calendar month covered by one period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Half {
    /// Days 1 to 15.
    First,
    /// Day 16 to month end.
    Second,
}

impl Half {
    /// Both halves in chronological order.
    pub const ALL: [Half; 2] = [Half::First, Half::Second];

    /// Zero-based index: 0 for the first half, 1 for the second.
    pub fn index(self) -> u32 {
        match self {
            Half::First => 0,
            Half::Second => 1,
        }
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Half::First => f.write_str("H1"),
            Half::Second => f.write_str("H2"),
        }
    }
}

/// Calendar identity of a fortnightly period, rendered as `YYYY-MM-H1|H2`.
///
/// Field order makes the derived `Ord` chronological, and it agrees with
/// lexicographic ordering of the rendered key for four-digit years.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    pub year: i32,
    /// Calendar month, 1..=12.
    pub month: u32,
    pub half: Half,
}

impl PeriodKey {
    /// Key of the period `month_offset` months after the month of `launch`.
    pub fn offset(launch: NaiveDate, month_offset: u32, half: Half) -> Self {
        let total = launch.month0() + month_offset;
        PeriodKey {
            year: launch.year() + (total / 12) as i32,
            month: total % 12 + 1,
            half,
        }
    }

    pub fn is_first_half(&self) -> bool {
        self.half == Half::First
    }

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Short display label, e.g. `Mar 2025 H2`.
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(d) => format!("{} {}", d.format("%b %Y"), self.half),
            None => self.to_string(),
        }
    }

    /// Month display label, e.g. `March 2025`.
    pub fn month_label(&self) -> String {
        match self.first_day() {
            Some(d) => d.format("%B %Y").to_string(),
            None => format!("{:04}-{:02}", self.year, self.month),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{}", self.year, self.month, self.half)
    }
}

impl FromStr for PeriodKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedPeriodKey(s.to_string());
        let mut parts = s.rsplitn(3, '-');
        let half = match parts.next() {
            Some("H1") => Half::First,
            Some("H2") => Half::Second,
            _ => return Err(malformed()),
        };
        let month: u32 = parts
            .next()
            .and_then(|m| m.parse().ok())
            .ok_or_else(malformed)?;
        let year: i32 = parts
            .next()
            .and_then(|y| y.parse().ok())
            .ok_or_else(malformed)?;
        if !(1..=12).contains(&month) {
            return Err(malformed());
        }
        Ok(PeriodKey { year, month, half })
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Financial outcome of one fortnight, for one book or a whole portfolio.
///
/// Invariants: `total_ad_spend == amazon_spend + facebook_spend` and
/// `net_profit == gross_revenue - total_ad_spend`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRecord {
    pub period_key: PeriodKey,
    pub label: String,
    pub month_label: String,
    pub is_first_half: bool,
    pub units_sold: u64,
    pub ku_reads: u64,
    pub gross_revenue: f64,
    pub amazon_spend: f64,
    pub facebook_spend: f64,
    pub total_ad_spend: f64,
    pub net_profit: f64,
}

impl PeriodRecord {
    /// All-zero record carrying the display identity of `key`.
    pub fn empty(key: PeriodKey) -> Self {
        PeriodRecord {
            period_key: key,
            label: key.label(),
            month_label: key.month_label(),
            is_first_half: key.is_first_half(),
            units_sold: 0,
            ku_reads: 0,
            gross_revenue: 0.0,
            amazon_spend: 0.0,
            facebook_spend: 0.0,
            total_ad_spend: 0.0,
            net_profit: 0.0,
        }
    }

    /// Add the metrics of `other` into `self`. Display fields are kept.
    pub fn absorb(&mut self, other: &PeriodRecord) {
        self.units_sold += other.units_sold;
        self.ku_reads += other.ku_reads;
        self.gross_revenue += other.gross_revenue;
        self.amazon_spend += other.amazon_spend;
        self.facebook_spend += other.facebook_spend;
        self.total_ad_spend += other.total_ad_spend;
        self.net_profit += other.net_profit;
    }
}

/// Headline KPIs over a sequence of periods.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_revenue: f64,
    pub total_ad_spend: f64,
    pub total_net_profit: f64,
    /// Percent return on ad spend; 1000 when there is revenue but no spend.
    pub roi: f64,
    /// Ad spend as a percent of revenue; 0 without revenue.
    pub ad_spend_share: f64,
}

/// Projection of a single book.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookProjection {
    pub book_id: BookId,
    pub title: String,
    pub periods: Vec<PeriodRecord>,
    pub summary: PortfolioSummary,
}

/// Merged projection of a whole portfolio.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProjection {
    /// Merged periods in ascending `period_key` order.
    pub periods: Vec<PeriodRecord>,
    pub summary: PortfolioSummary,
    /// Per-book projections in input order.
    pub books: Vec<BookProjection>,
}

/// Input contract violations reported to portfolio loaders.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("book id must not be empty")]
    EmptyId,
    #[error("duplicate book id: {0}")]
    DuplicateId(String),
    /// Quality outside [1, 10].
    #[error("quality {0} is out of supported range [1, 10]")]
    QualityOutOfRange(u8),
    #[error("word count must be > 0")]
    ZeroWordCount,
    /// Budgets, series value and prices must be non-negative.
    #[error("negative monetary value is invalid")]
    NegativeMoney,
    #[error("manual prices must be > 0")]
    NonPositivePrice,
    #[error("malformed period key: {0}")]
    MalformedPeriodKey(String),
}

/// Validate a single book against the input contract.
pub fn validate_book(book: &Book) -> Result<(), ValidationError> {
    if book.id.0.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    if !(1..=10).contains(&book.quality) {
        return Err(ValidationError::QualityOutOfRange(book.quality));
    }
    if book.word_count == 0 {
        return Err(ValidationError::ZeroWordCount);
    }
    let money = [
        book.series_ltv,
        book.amazon_ad_budget,
        book.facebook_ad_budget,
        book.price_launch,
        book.price_normal,
    ];
    if money.iter().any(|m| *m < Decimal::ZERO) {
        return Err(ValidationError::NegativeMoney);
    }
    if book.manual_pricing && (book.price_launch.is_zero() || book.price_normal.is_zero()) {
        return Err(ValidationError::NonPositivePrice);
    }
    Ok(())
}

/// Validate every book and reject duplicate ids.
pub fn validate_portfolio(books: &[Book]) -> Result<(), ValidationError> {
    let mut ids: BTreeSet<&BookId> = BTreeSet::new();
    for b in books {
        validate_book(b)?;
        if !ids.insert(&b.id) {
            return Err(ValidationError::DuplicateId(b.id.0.clone()));
        }
    }
    debug!(books = books.len(), "portfolio passed validation");
    Ok(())
}
