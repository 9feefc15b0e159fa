//! Macrotrends HTTP client.

use std::time::Duration;

use reqwest::{Client, header};
use tracing::debug;

use crate::{Result, error::ScrapeError, parse::{parse_annual_fcf, title_case}};

/// Base URL of the macrotrends site.
pub const MACROTRENDS_BASE_URL: &str = "https://www.macrotrends.net";

/// Browser user agent; the site rejects the default reqwest one.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/122.0 Safari/537.36";

/// Scraper for annual free cash flow history.
#[derive(Debug, Clone)]
pub struct MacrotrendsClient {
    client: Client,
    base_url: String,
}

impl Default for MacrotrendsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MacrotrendsClient {
    /// Create a client pointed at the public site.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: MACROTRENDS_BASE_URL.to_string(),
        }
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

    /// URL of the free cash flow page for a company.
    #[must_use]
    pub fn free_cash_flow_url(&self, ticker: &str, name: &str) -> String {
        format!(
            "{}/stocks/charts/{ticker}/{}/free-cash-flow",
            self.base_url,
            title_case(name)
        )
    }

    /// Fetch a company's page and extract its annual free cash flows, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidName`] if `name` is not a slug of ASCII
    /// letters, digits and `-`, and an error if the request fails or the page
    /// lacks the annual table.
    pub async fn annual_free_cash_flow(&self, ticker: &str, name: &str) -> Result<Vec<i64>> {
        validate_name(name)?;
        let url = self.free_cash_flow_url(ticker, name);
        debug!(%url, "macrotrends request");

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScrapeError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let html = response.text().await?;
        let values = parse_annual_fcf(&html, name)?;
        debug!(ticker, years = values.len(), "parsed annual free cash flow");
        Ok(values)
    }
}

/// Company names become a URL path segment.
fn validate_name(name: &str) -> Result<()> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        Ok(())
    } else {
        Err(ScrapeError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = MacrotrendsClient::new();
        assert_eq!(
            client.free_cash_flow_url("TSLA", "tesla"),
            "https://www.macrotrends.net/stocks/charts/TSLA/Tesla/free-cash-flow"
        );
    }

    #[test]
    fn test_name_must_be_slug() {
        assert!(validate_name("meta-platforms").is_ok());
        assert!(validate_name("3m").is_ok());
        for bad in ["", "tesla?x=1", "tesla#top", "../admin", "tesla motors", "t%2F"] {
            assert!(
                matches!(validate_name(bad), Err(ScrapeError::InvalidName(_))),
                "{bad}"
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_name_rejected_before_request() {
        // Nothing listens here; a request would fail with a transport error.
        let client = MacrotrendsClient::new().with_base_url("http://127.0.0.1:1");
        assert!(matches!(
            client.annual_free_cash_flow("TSLA", "tesla/../x").await,
            Err(ScrapeError::InvalidName(_))
        ));
    }
}
