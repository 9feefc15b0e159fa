//! Macrotrends scraper for Intrinsic.
//!
//! Fetches a company's annual free cash flow history from
//! [macrotrends](https://www.macrotrends.net/) and implements
//! [`intrinsic_traits::FcfHistorySource`] on top of it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use intrinsic_macrotrends::MacrotrendsClient;
//!
//! let client = MacrotrendsClient::new();
//! let history = client.annual_free_cash_flow("TSLA", "tesla").await?;
//! ```

mod client;
mod error;
mod parse;
mod provider;

pub use client::{MACROTRENDS_BASE_URL, MacrotrendsClient};
pub use error::ScrapeError;
pub use parse::{annual_header, parse_annual_fcf, parse_cell, title_case};

/// Result type for scraping operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;
