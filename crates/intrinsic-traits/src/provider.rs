//! Data-provider capabilities.
//!
//! The valuation engine never talks to the network directly. It consumes
//! these two traits, which the FMP client, the macrotrends scraper and the
//! in-memory [`FixtureProvider`](crate::FixtureProvider) implement.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Date, PricePoint, StatementTable, Ticker};

/// Market data and company fundamentals.
///
/// Optional values (`Ok(None)`) mean the provider answered but does not know
/// the figure; the engine decides whether that is a default or an error.
/// Lookups for unknown tickers should fail with
/// [`ValuationError::NotFound`](crate::ValuationError::NotFound).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Most recent closing price.
    async fn spot_price(&self, ticker: &Ticker) -> Result<f64>;

    /// Daily closes between `from` and `to`, both inclusive, in ascending date order.
    async fn price_history(&self, ticker: &Ticker, from: Date, to: Date) -> Result<Vec<PricePoint>>;

    /// Annual balance sheets, most recent first.
    async fn balance_sheet(&self, ticker: &Ticker) -> Result<StatementTable>;

    /// Annual income statements, most recent first.
    async fn income_statement(&self, ticker: &Ticker) -> Result<StatementTable>;

    /// Annual cash flow statements, most recent first.
    async fn cash_flow_statement(&self, ticker: &Ticker) -> Result<StatementTable>;

    /// Market capitalization in the reporting currency.
    async fn market_cap(&self, ticker: &Ticker) -> Result<Option<f64>>;

    /// Number of shares outstanding.
    async fn shares_outstanding(&self, ticker: &Ticker) -> Result<Option<f64>>;

    /// Equity beta against the market.
    async fn beta(&self, ticker: &Ticker) -> Result<Option<f64>>;

    /// Latest 10-year treasury yield, in percent (e.g. `4.25`).
    async fn treasury_yield_10y(&self) -> Result<Option<f64>>;
}

/// Historical annual free cash flow from a public financial-data site.
#[async_trait]
pub trait FcfHistorySource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Annual free cash flows, most recent first, in whole currency units.
    ///
    /// `company` is the company name as used in the source's URLs
    /// (e.g. `"tesla"`).
    async fn annual_free_cash_flow(&self, ticker: &Ticker, company: &str) -> Result<Vec<i64>>;
}
