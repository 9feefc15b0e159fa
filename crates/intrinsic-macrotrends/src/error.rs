//! Error types for the macrotrends scraper.

use intrinsic_traits::ValuationError;
use thiserror::Error;

/// Errors that can occur while scraping free cash flow history.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The site answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status {
        /// Response status code.
        status: u16,
        /// Requested page.
        url: String,
    },

    /// The company name is not a plain URL slug.
    #[error("Invalid company name {0:?}: use letters, digits and '-' only")]
    InvalidName(String),

    /// The annual table header is not on the page.
    #[error("Header not found: {0}")]
    HeaderNotFound(String),

    /// No table body follows the header.
    #[error("tbody after header not found")]
    TableNotFound,

    /// A table cell is not a number.
    #[error("Invalid cash flow value: {0:?}")]
    InvalidValue(String),

    /// A CSS selector failed to parse.
    #[error("Invalid CSS selector: {0}")]
    Selector(String),
}

impl From<ScrapeError> for ValuationError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::HeaderNotFound(_) | ScrapeError::TableNotFound => {
                Self::NotFound(err.to_string())
            }
            ScrapeError::Status { status: 404, .. } => Self::NotFound(err.to_string()),
            ScrapeError::InvalidName(_) => Self::InvalidParameter(err.to_string()),
            other => Self::Upstream(other.to_string()),
        }
    }
}
