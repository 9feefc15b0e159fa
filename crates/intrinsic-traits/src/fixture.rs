//! In-memory data provider.
//!
//! [`FixtureProvider`] serves canned data for tests, demos and offline runs.
//! It implements both [`MarketDataProvider`] and [`FcfHistorySource`].

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Result, ValuationError};
use crate::provider::{FcfHistorySource, MarketDataProvider};
use crate::types::{Date, PricePoint, StatementKind, StatementTable, Ticker};

/// Canned data for one company.
#[derive(Debug, Clone)]
pub struct FixtureCompany {
    /// Daily closes, ascending by date. The last one is the spot price.
    pub prices: Vec<PricePoint>,
    /// Balance sheet.
    pub balance_sheet: StatementTable,
    /// Income statement.
    pub income_statement: StatementTable,
    /// Cash flow statement.
    pub cash_flow: StatementTable,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Shares outstanding.
    pub shares_outstanding: Option<f64>,
    /// Equity beta.
    pub beta: Option<f64>,
    /// Annual free cash flow history, most recent first.
    pub fcf_history: Vec<i64>,
}

impl Default for FixtureCompany {
    fn default() -> Self {
        Self {
            prices: Vec::new(),
            balance_sheet: StatementTable::new(StatementKind::BalanceSheet),
            income_statement: StatementTable::new(StatementKind::IncomeStatement),
            cash_flow: StatementTable::new(StatementKind::CashFlow),
            market_cap: None,
            shares_outstanding: None,
            beta: None,
            fcf_history: Vec::new(),
        }
    }
}

/// A provider backed by an in-memory map of companies.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    companies: HashMap<Ticker, FixtureCompany>,
    treasury_yield: Option<f64>,
}

impl FixtureProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a company.
    #[must_use]
    pub fn with_company(mut self, ticker: Ticker, company: FixtureCompany) -> Self {
        self.companies.insert(ticker, company);
        self
    }

    /// Set the 10-year treasury yield, in percent.
    #[must_use]
    pub const fn with_treasury_yield(mut self, percent: f64) -> Self {
        self.treasury_yield = Some(percent);
        self
    }

    fn company(&self, ticker: &Ticker) -> Result<&FixtureCompany> {
        self.companies
            .get(ticker)
            .ok_or_else(|| ValuationError::NotFound(format!("ticker {ticker}")))
    }
}

#[async_trait]
impl MarketDataProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn spot_price(&self, ticker: &Ticker) -> Result<f64> {
        self.company(ticker)?
            .prices
            .last()
            .map(|p| p.price)
            .ok_or_else(|| ValuationError::NotFound(format!("price data for {ticker}")))
    }

    async fn price_history(&self, ticker: &Ticker, from: Date, to: Date) -> Result<Vec<PricePoint>> {
        Ok(self
            .company(ticker)?
            .prices
            .iter()
            .filter(|p| p.parsed_date().is_some_and(|d| d >= from && d <= to))
            .cloned()
            .collect())
    }

    async fn balance_sheet(&self, ticker: &Ticker) -> Result<StatementTable> {
        Ok(self.company(ticker)?.balance_sheet.clone())
    }

    async fn income_statement(&self, ticker: &Ticker) -> Result<StatementTable> {
        Ok(self.company(ticker)?.income_statement.clone())
    }

    async fn cash_flow_statement(&self, ticker: &Ticker) -> Result<StatementTable> {
        Ok(self.company(ticker)?.cash_flow.clone())
    }

    async fn market_cap(&self, ticker: &Ticker) -> Result<Option<f64>> {
        Ok(self.company(ticker)?.market_cap)
    }

    async fn shares_outstanding(&self, ticker: &Ticker) -> Result<Option<f64>> {
        Ok(self.company(ticker)?.shares_outstanding)
    }

    async fn beta(&self, ticker: &Ticker) -> Result<Option<f64>> {
        Ok(self.company(ticker)?.beta)
    }

    async fn treasury_yield_10y(&self) -> Result<Option<f64>> {
        Ok(self.treasury_yield)
    }
}

#[async_trait]
impl FcfHistorySource for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn annual_free_cash_flow(&self, ticker: &Ticker, _company: &str) -> Result<Vec<i64>> {
        let history = &self.company(ticker)?.fcf_history;
        if history.is_empty() {
            return Err(ValuationError::NotFound(format!(
                "free cash flow history for {ticker}"
            )));
        }
        Ok(history.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> FixtureProvider {
        let company = FixtureCompany {
            prices: vec![
                PricePoint::new("2024-01-02", 100.0),
                PricePoint::new("2024-01-03", 101.0),
                PricePoint::new("2024-01-04", 99.5),
            ],
            beta: Some(1.2),
            fcf_history: vec![121, 110, 100],
            ..FixtureCompany::default()
        };
        FixtureProvider::new()
            .with_company(Ticker::new("ACME").unwrap(), company)
            .with_treasury_yield(4.2)
    }

    #[tokio::test]
    async fn test_spot_price_is_last_close() {
        let p = provider();
        let ticker = Ticker::new("acme").unwrap();
        assert_eq!(p.spot_price(&ticker).await.unwrap(), 99.5);
        assert_eq!(p.beta(&ticker).await.unwrap(), Some(1.2));
        assert_eq!(p.treasury_yield_10y().await.unwrap(), Some(4.2));
    }

    #[tokio::test]
    async fn test_price_history_window() {
        let p = provider();
        let ticker = Ticker::new("ACME").unwrap();
        let from = Date::from_ymd_opt(2024, 1, 3).unwrap();
        let to = Date::from_ymd_opt(2024, 1, 4).unwrap();
        let window = p.price_history(&ticker, from, to).await.unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].date, "2024-01-03");
    }

    #[tokio::test]
    async fn test_unknown_ticker() {
        let p = provider();
        let ticker = Ticker::new("NOPE").unwrap();
        assert!(matches!(
            p.spot_price(&ticker).await,
            Err(ValuationError::NotFound(_))
        ));
        assert!(matches!(
            p.annual_free_cash_flow(&ticker, "nope").await,
            Err(ValuationError::NotFound(_))
        ));
    }
}
