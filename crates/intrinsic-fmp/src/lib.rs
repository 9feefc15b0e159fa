//! Financial Modeling Prep (FMP) API client for Intrinsic.
//!
//! This crate provides a client for fetching quotes, prices and annual
//! financial statements from the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API, and
//! implements [`intrinsic_traits::MarketDataProvider`] on top of it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use intrinsic_fmp::{FmpClient, Period};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FmpClient::from_env()?;
//!
//!     // Fetch balance sheets
//!     let balance = client.balance_sheet("TSLA", Period::Annual, Some(5)).await?;
//!
//!     // Fetch beta and market cap
//!     let profile = client.profile("TSLA").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod provider;
mod types;

pub use client::{FMP_BASE_URL, FmpClient};
pub use error::FmpError;
pub use provider::STATEMENT_LIMIT;
pub use types::*;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
