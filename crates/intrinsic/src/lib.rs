#![doc(issue_tracker_base_url = "https://github.com/factordynamics/intrinsic/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # intrinsic
//!
//! Intrinsic value estimation for listed equities.
//!
//! intrinsic is an umbrella crate that re-exports all intrinsic sub-crates for
//! convenience. It bundles the valuation formulas, the market data and
//! scraping providers, and the HTTP service that exposes them.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use intrinsic::{DcfParameters, Ticker, Valuator};
//! use intrinsic::fmp::FmpClient;
//! use intrinsic::macrotrends::MacrotrendsClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let valuator = Valuator::new(
//!     Arc::new(FmpClient::from_env()?),
//!     Arc::new(MacrotrendsClient::new()),
//! );
//!
//! let tsla = Ticker::new("TSLA")?;
//! let capm = valuator.capm(&tsla).await?;
//! let wacc = valuator.wacc(&tsla, capm).await?;
//! let params = DcfParameters {
//!     base_fcf: valuator.base_fcf(&tsla).await?,
//!     growth_rate: 0.15,
//!     perpetual_growth_rate: 0.025,
//!     discount_rate: wacc,
//!     years: 10,
//! };
//! let value = valuator.dcf(&tsla, &params, true).await?;
//! println!("{:.2}", value.base_case);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Shared types, errors and the provider traits
//! - [`engine`] - CAGR, CAPM, WACC, free cash flow and DCF calculations
//! - [`fmp`] - Financial Modeling Prep market data client
//! - [`macrotrends`] - Annual free cash flow history scraper
//! - [`server`] - axum HTTP API
//!
//! ## Data Flow
//!
//! 1. **Providers** fetch quotes, statements and cash flow history
//! 2. **Formulas** turn them into cost of capital and cash flow estimates
//! 3. **DCF** discounts projected cash flows to a per-share value
//! 4. **Server** exposes each step as a JSON endpoint

/// Version information for the intrinsic crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Shared types, errors and provider traits.
///
/// - [`MarketDataProvider`] - Quotes, statements, profile data and treasury yields
/// - [`FcfHistorySource`] - Annual free cash flow history
/// - [`StatementTable`] - A financial statement keyed by [`LineItem`]
pub mod traits {
    pub use intrinsic_traits::*;
}

pub use intrinsic_traits::{FcfHistorySource, MarketDataProvider};
pub use intrinsic_traits::{Result, ValuationError};
pub use intrinsic_traits::{
    CagrResult, DcfParameters, DcfValuation, LineItem, PricePoint, StatementTable, Ticker,
};

// ============================================================================
// Valuation Engine
// ============================================================================

/// Valuation formulas and the [`Valuator`] that feeds them from providers.
///
/// ## Formulas
///
/// ### CAPM
///
/// ```text
/// cost_of_equity = rf + beta * (erp)
/// ```
///
/// ### WACC
///
/// ```text
/// WACC = E/V * Re + D/V * Rd * (1 - Tc)
/// ```
///
/// ### Terminal value
///
/// ```text
/// TV = FCF_n * (1 + g) / (r - g)
/// ```
///
/// The perpetual growth rate must stay strictly below the discount rate.
pub mod engine {
    pub use intrinsic_engine::*;
}

pub use intrinsic_engine::{CapmAssumptions, DcfBreakdown, ValuationReport, Valuator, WaccBreakdown};

// ============================================================================
// Data Providers
// ============================================================================

/// Financial Modeling Prep (FMP) API client.
///
/// ## Setup
///
/// 1. Get an API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add it to a `.env` file
pub mod fmp {
    pub use intrinsic_fmp::*;
}

/// Scraper for annual free cash flow tables on macrotrends.net.
pub mod macrotrends {
    pub use intrinsic_macrotrends::*;
}

// ============================================================================
// HTTP Service
// ============================================================================

/// The axum HTTP API, its configuration and logging setup.
pub mod server {
    pub use intrinsic_server::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use intrinsic::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        DcfParameters, DcfValuation, FcfHistorySource, MarketDataProvider, Result, Ticker,
        ValuationError, Valuator,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_re_exports() {
        fn _accept_market(_provider: &dyn MarketDataProvider) {}
        fn _accept_history(_source: &dyn FcfHistorySource) {}

        let provider = traits::FixtureProvider::new();
        _accept_market(&provider);
        _accept_history(&provider);
    }

    #[test]
    fn test_error_types() {
        let _result: Result<()> = Ok(());
        let error = ValuationError::NotFound("ticker ZZZZ".to_string());
        assert!(error.is_lookup());
    }
}
