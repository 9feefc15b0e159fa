//! [`MarketDataProvider`] implementation backed by the FMP API.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use intrinsic_traits::{
    DATE_FORMAT, Date, MarketDataProvider, PricePoint, Result, StatementTable, Ticker,
};
use tracing::debug;

use crate::{
    FmpClient,
    types::{Period, statement_table},
};

/// Number of annual statements fetched per request.
pub const STATEMENT_LIMIT: u32 = 5;

/// How far back to look for the latest published treasury curve.
const TREASURY_LOOKBACK_DAYS: i64 = 14;

#[async_trait]
impl MarketDataProvider for FmpClient {
    fn name(&self) -> &'static str {
        "fmp"
    }

    async fn spot_price(&self, ticker: &Ticker) -> Result<f64> {
        let quote = self.quote(ticker.as_str()).await?;
        Ok(quote.price)
    }

    async fn price_history(&self, ticker: &Ticker, from: Date, to: Date) -> Result<Vec<PricePoint>> {
        let from = from.format(DATE_FORMAT).to_string();
        let to = to.format(DATE_FORMAT).to_string();
        let mut prices = self
            .historical_prices(ticker.as_str(), Some(&from), Some(&to))
            .await?;
        prices.sort_by(|a, b| a.date.cmp(&b.date));
        debug!(ticker = %ticker, count = prices.len(), "fetched price history");

        Ok(prices
            .into_iter()
            .map(|p| PricePoint::new(p.date, p.close))
            .collect())
    }

    async fn balance_sheet(&self, ticker: &Ticker) -> Result<StatementTable> {
        let rows = FmpClient::balance_sheet(self, ticker.as_str(), Period::Annual, Some(STATEMENT_LIMIT))
            .await?;
        Ok(statement_table(&rows))
    }

    async fn income_statement(&self, ticker: &Ticker) -> Result<StatementTable> {
        let rows =
            FmpClient::income_statement(self, ticker.as_str(), Period::Annual, Some(STATEMENT_LIMIT))
                .await?;
        Ok(statement_table(&rows))
    }

    async fn cash_flow_statement(&self, ticker: &Ticker) -> Result<StatementTable> {
        let rows = self
            .cash_flow(ticker.as_str(), Period::Annual, Some(STATEMENT_LIMIT))
            .await?;
        Ok(statement_table(&rows))
    }

    async fn market_cap(&self, ticker: &Ticker) -> Result<Option<f64>> {
        Ok(self.profile(ticker.as_str()).await?.market_cap)
    }

    async fn shares_outstanding(&self, ticker: &Ticker) -> Result<Option<f64>> {
        Ok(self
            .shares_float(ticker.as_str())
            .await?
            .and_then(|float| float.outstanding_shares))
    }

    async fn beta(&self, ticker: &Ticker) -> Result<Option<f64>> {
        Ok(self.profile(ticker.as_str()).await?.beta)
    }

    async fn treasury_yield_10y(&self) -> Result<Option<f64>> {
        let to = Utc::now().date_naive();
        let from = to - Duration::days(TREASURY_LOOKBACK_DAYS);
        let rates = self.treasury_rates(from, to).await?;

        Ok(rates
            .into_iter()
            .filter(|r| r.year10.is_some())
            .max_by(|a, b| a.date.cmp(&b.date))
            .and_then(|r| r.year10))
    }
}
