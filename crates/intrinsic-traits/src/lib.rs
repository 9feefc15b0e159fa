#![doc(issue_tracker_base_url = "https://github.com/factordynamics/intrinsic/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and capabilities for the Intrinsic valuation service.
//!
//! This crate provides the shared vocabulary of the workspace: tickers,
//! financial statement tables, DCF inputs and results, the error taxonomy, and
//! the data-provider traits the valuation engine is written against.

/// The version of the intrinsic-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod fixture;
pub mod provider;
pub mod types;

// Re-exports
pub use error::{Result, ValuationError};
pub use fixture::{FixtureCompany, FixtureProvider};
pub use provider::{FcfHistorySource, MarketDataProvider};
pub use types::{
    COMPANY_PROFILE, CagrResult, DATE_FORMAT, Date, DcfParameters, DcfValuation, LineItem,
    MARGIN_OF_SAFETY_FACTOR, MAX_DCF_YEARS, PricePoint, StatementKind, StatementTable, Ticker,
};
