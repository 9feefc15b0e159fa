//! Common types used throughout the Intrinsic service.
//!
//! This module defines the transient value types that flow between the data
//! providers, the valuation engine and the HTTP layer: tickers, price points,
//! financial statement tables and the DCF/CAGR inputs and results.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValuationError};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// Date format used by every provider and by the HTTP API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fraction of the base case kept by the margin-of-safety variant.
pub const MARGIN_OF_SAFETY_FACTOR: f64 = 0.7;

/// Source label for figures that come from the company profile rather than a statement.
pub const COMPANY_PROFILE: &str = "company profile";

/// A stock symbol.
///
/// Tickers are case-insensitive; they are stored upper-cased so that `tsla`
/// and `TSLA` identify the same lookups. Index symbols such as `^TNX` are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Parse and normalize a ticker symbol.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidParameter`] if the symbol is empty or
    /// contains characters other than ASCII alphanumerics, `.`, `-`, `^` or `=`.
    pub fn new(symbol: &str) -> Result<Self> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ValuationError::InvalidParameter("ticker is empty".to_string()));
        }
        if let Some(bad) = symbol
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
        {
            return Err(ValuationError::InvalidParameter(format!(
                "ticker {symbol:?} contains invalid character {bad:?}"
            )));
        }
        Ok(Self(symbol.to_ascii_uppercase()))
    }

    /// The normalized (upper-case) symbol.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = ValuationError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Closing price on that date.
    pub price: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(date: impl Into<String>, price: f64) -> Self {
        Self {
            date: date.into(),
            price,
        }
    }

    /// Parse the date string into a [`Date`].
    #[must_use]
    pub fn parsed_date(&self) -> Option<Date> {
        Date::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// Line items the valuation engine understands.
///
/// Most come from the three financial statements; market cap and share count
/// come from the company profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LineItem {
    /// Short plus long term debt (balance sheet).
    TotalDebt,
    /// Cash and cash equivalents (balance sheet).
    CashAndCashEquivalents,
    /// Interest expense (income statement).
    InterestExpense,
    /// Income tax provision (income statement).
    TaxProvision,
    /// Income before tax (income statement).
    PretaxIncome,
    /// Net income (income statement).
    NetIncome,
    /// Diluted earnings per share (income statement).
    DilutedEps,
    /// Operating cash flow minus capital expenditure (cash flow statement).
    FreeCashFlow,
    /// Market capitalization (company profile).
    MarketCap,
    /// Shares outstanding (company profile).
    SharesOutstanding,
}

impl LineItem {
    /// Canonical name of the line item.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TotalDebt => "TotalDebt",
            Self::CashAndCashEquivalents => "CashAndCashEquivalents",
            Self::InterestExpense => "InterestExpense",
            Self::TaxProvision => "TaxProvision",
            Self::PretaxIncome => "PretaxIncome",
            Self::NetIncome => "NetIncome",
            Self::DilutedEps => "DilutedEps",
            Self::FreeCashFlow => "FreeCashFlow",
            Self::MarketCap => "MarketCap",
            Self::SharesOutstanding => "SharesOutstanding",
        }
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which financial statement a [`StatementTable`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Balance sheet.
    BalanceSheet,
    /// Income statement.
    IncomeStatement,
    /// Cash flow statement.
    CashFlow,
}

impl StatementKind {
    /// Human readable statement name, used in error messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance sheet",
            Self::IncomeStatement => "income statement",
            Self::CashFlow => "cash flow statement",
        }
    }
}

/// One financial statement across reporting periods.
///
/// Periods are ordered most recent first, so the first column is the latest
/// report. A row exists only for line items the provider reported in at least
/// one period; a period that omits an item leaves a gap in that row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTable {
    kind: StatementKind,
    periods: Vec<String>,
    rows: BTreeMap<LineItem, Vec<Option<f64>>>,
}

impl StatementTable {
    /// Create an empty statement.
    #[must_use]
    pub const fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            periods: Vec::new(),
            rows: BTreeMap::new(),
        }
    }

    /// Append an older reporting period.
    ///
    /// Periods must be pushed newest first. Items given as `None` are treated
    /// as not reported for that period.
    pub fn push_period<I>(&mut self, date: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = (LineItem, Option<f64>)>,
    {
        let column = self.periods.len();
        self.periods.push(date.into());

        for (item, value) in items {
            let Some(value) = value else { continue };
            let row = self.rows.entry(item).or_default();
            row.resize(column + 1, None);
            row[column] = Some(value);
        }

        for row in self.rows.values_mut() {
            row.resize(column + 1, None);
        }
    }

    /// Builder-style variant of [`push_period`](Self::push_period).
    #[must_use]
    pub fn with_period<I>(mut self, date: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = (LineItem, Option<f64>)>,
    {
        self.push_period(date, items);
        self
    }

    /// The statement kind.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Reporting period dates, most recent first.
    #[must_use]
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Number of reporting periods.
    #[must_use]
    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    /// Whether the statement has no reporting periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Whether the provider reported `item` in any period.
    #[must_use]
    pub fn has_row(&self, item: LineItem) -> bool {
        self.rows.contains_key(&item)
    }

    /// Reported values of a row, most recent first, skipping gaps.
    ///
    /// Returns `None` if the row is absent.
    #[must_use]
    pub fn row(&self, item: LineItem) -> Option<Vec<f64>> {
        self.rows
            .get(&item)
            .map(|row| row.iter().flatten().copied().collect())
    }

    /// Values of a row per period, most recent first, `None` where not reported.
    ///
    /// Returns `None` if the row is absent.
    #[must_use]
    pub fn columns(&self, item: LineItem) -> Option<&[Option<f64>]> {
        self.rows.get(&item).map(Vec::as_slice)
    }

    /// Value of `item` in the most recent period.
    #[must_use]
    pub fn latest(&self, item: LineItem) -> Option<f64> {
        self.rows.get(&item).and_then(|row| row.first().copied().flatten())
    }

    /// Value of `item` in the most recent period, or a [`ValuationError::MissingField`].
    ///
    /// # Errors
    ///
    /// Returns an error if the latest period does not report `item`.
    pub fn require_latest(&self, item: LineItem) -> Result<f64> {
        self.latest(item)
            .ok_or_else(|| ValuationError::missing(self.kind.label(), item))
    }
}

/// Longest explicit projection a DCF accepts, in years.
pub const MAX_DCF_YEARS: u32 = 100;

/// Inputs of a two-stage discounted cash flow valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcfParameters {
    /// Free cash flow the projection starts from.
    pub base_fcf: f64,
    /// Annual growth during the explicit projection (fractional).
    pub growth_rate: f64,
    /// Growth after the projection horizon (fractional).
    pub perpetual_growth_rate: f64,
    /// Discount rate, usually the WACC (fractional).
    pub discount_rate: f64,
    /// Number of explicitly projected years.
    pub years: u32,
}

impl DcfParameters {
    /// Check the parameters before any data is fetched.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidParameter`] for non-finite values or
    /// `years` outside `1..=MAX_DCF_YEARS`, and [`ValuationError::InvalidRateRelationship`] when the
    /// perpetual growth rate is not strictly below the discount rate.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("base_fcf", self.base_fcf),
            ("growth_rate", self.growth_rate),
            ("perpetual_growth_rate", self.perpetual_growth_rate),
            ("discount_rate", self.discount_rate),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValuationError::InvalidParameter(format!("{name} must be finite")));
        }
        if self.years == 0 {
            return Err(ValuationError::InvalidParameter(
                "years must be a positive integer".to_string(),
            ));
        }
        if self.years > MAX_DCF_YEARS {
            return Err(ValuationError::InvalidParameter(format!(
                "years must be at most {MAX_DCF_YEARS}"
            )));
        }
        if self.perpetual_growth_rate >= self.discount_rate {
            return Err(ValuationError::InvalidRateRelationship {
                perpetual_growth_rate: self.perpetual_growth_rate,
                discount_rate: self.discount_rate,
            });
        }
        Ok(())
    }
}

/// Result of a DCF valuation, per share.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcfValuation {
    /// Intrinsic value per share, rounded to cents.
    pub base_case: f64,
    /// `0.7 × base_case`, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thirty_percent_margin_of_safety: Option<f64>,
}

impl DcfValuation {
    /// A valuation without the margin-of-safety figure.
    #[must_use]
    pub const fn new(base_case: f64) -> Self {
        Self {
            base_case,
            thirty_percent_margin_of_safety: None,
        }
    }

    /// Attach the 30% margin-of-safety value.
    #[must_use]
    pub fn with_margin_of_safety(mut self) -> Self {
        self.thirty_percent_margin_of_safety = Some(self.base_case * MARGIN_OF_SAFETY_FACTOR);
        self
    }
}

/// Compound annual growth of a free cash flow series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CagrResult {
    /// Growth rate, rounded to 3 decimals.
    pub cagr: f64,
    /// Most recent cash flow of the series.
    pub latest_fcf: i64,
}

impl CagrResult {
    /// The growth rate rendered with 3 decimals, e.g. `"0.066"`.
    #[must_use]
    pub fn formatted(&self) -> String {
        format!("{:.3}", self.cagr)
    }
}
