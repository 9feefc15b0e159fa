//! FMP API client implementation.

use crate::{
    Result,
    error::FmpError,
    types::{
        BalanceSheet, CashFlowStatement, CompanyProfile, HistoricalPrice, IncomeStatement, Period,
        Quote, SharesFloat, TreasuryRates,
    },
};
use chrono::NaiveDate;
use reqwest::Client;
use std::{env, time::Duration};
use tracing::debug;

/// Base URL for the FMP stable API.
pub const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Financial Modeling Prep API client.
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FmpClient {
    /// Create a new FMP client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: FMP_BASE_URL.to_string(),
        }
    }

    /// Create a new FMP client from the `FMP_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var("FMP_API_KEY").map_err(|_| FmpError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Point the client at another server, e.g. a local mock.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a whole-request timeout to every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        let base = &self.base_url;
        if endpoint.contains('?') {
            format!("{base}/{endpoint}&apikey={}", self.api_key)
        } else {
            format!("{base}/{endpoint}?apikey={}", self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    ///
    /// Errors never carry the request URL (it holds the API key) or the raw
    /// response body; the body is logged at `debug` instead.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        debug!(endpoint, "fmp request");
        let url = self.url(endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FmpError::Request(e.without_url()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FmpError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            debug!(endpoint, %status, body = %text, "fmp error response");
            return Err(FmpError::Api(format!("HTTP {status} from {}", endpoint_name(endpoint))));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FmpError::Request(e.without_url()))?;

        // Check for error responses
        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            debug!(endpoint, body = %text, "fmp error message");
            return Err(FmpError::Api(format!(
                "error message from {}",
                endpoint_name(endpoint)
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            debug!(endpoint, body = %text, error = %e, "fmp response did not parse");
            FmpError::Json(e)
        })
    }

    /// Get the first element of a list endpoint, or `SymbolNotFound`.
    async fn get_first<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        symbol: &str,
    ) -> Result<T> {
        let items: Vec<T> = self.get(endpoint).await?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| FmpError::SymbolNotFound(symbol.to_uppercase()))
    }

    fn statement_endpoint(name: &str, symbol: &str, period: Period, limit: Option<u32>) -> String {
        let limit_param = limit.map(|l| format!("&limit={l}")).unwrap_or_default();
        format!(
            "{name}?symbol={}&period={}{}",
            symbol.to_uppercase(),
            period.as_str(),
            limit_param
        )
    }

    /// Get income statements for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol (e.g., "AAPL")
    /// * `period` - Annual or quarterly
    /// * `limit` - Number of periods to return (most recent first)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn income_statement(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<IncomeStatement>> {
        let endpoint = Self::statement_endpoint("income-statement", symbol, period, limit);
        self.get(&endpoint).await
    }

    /// Get balance sheets for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn balance_sheet(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<BalanceSheet>> {
        let endpoint = Self::statement_endpoint("balance-sheet-statement", symbol, period, limit);
        self.get(&endpoint).await
    }

    /// Get cash flow statements for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn cash_flow(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<CashFlowStatement>> {
        let endpoint = Self::statement_endpoint("cash-flow-statement", symbol, period, limit);
        self.get(&endpoint).await
    }

    /// Get real-time quote for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the symbol is unknown.
    pub async fn quote(&self, symbol: &str) -> Result<Quote> {
        let endpoint = format!("quote?symbol={}", symbol.to_uppercase());
        self.get_first(&endpoint, symbol).await
    }

    /// Get the company profile (beta, market cap) for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the symbol is unknown.
    pub async fn profile(&self, symbol: &str) -> Result<CompanyProfile> {
        let endpoint = format!("profile?symbol={}", symbol.to_uppercase());
        self.get_first(&endpoint, symbol).await
    }

    /// Get share float data for a symbol.
    ///
    /// Returns `None` when FMP has no float data for the symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn shares_float(&self, symbol: &str) -> Result<Option<SharesFloat>> {
        let endpoint = format!("shares-float?symbol={}", symbol.to_uppercase());
        let items: Vec<SharesFloat> = self.get(&endpoint).await?;
        Ok(items.into_iter().next())
    }

    /// Get daily treasury yield curves between two dates.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn treasury_rates(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<TreasuryRates>> {
        let endpoint = format!("treasury-rates?from={from}&to={to}");
        self.get(&endpoint).await
    }

    /// Get historical daily prices for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol
    /// * `from` - Start date (YYYY-MM-DD)
    /// * `to` - End date (YYYY-MM-DD)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn historical_prices(
        &self,
        symbol: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<HistoricalPrice>> {
        let mut params = String::new();
        if let Some(f) = from {
            params.push_str(&format!("&from={f}"));
        }
        if let Some(t) = to {
            params.push_str(&format!("&to={t}"));
        }

        let endpoint = format!(
            "historical-price-eod/full?symbol={}{}",
            symbol.to_uppercase(),
            params
        );
        // The stable API returns a flat array, not a wrapped response
        self.get(&endpoint).await
    }
}

/// Path part of an endpoint, without the query string.
fn endpoint_name(endpoint: &str) -> &str {
    endpoint.split('?').next().unwrap_or(endpoint)
}
