//! Error types for the Intrinsic valuation service.
//!
//! Every failure a valuation can hit, whether it comes from a missing line item,
//! a too-short series, an inconsistent set of rates or an upstream provider,
//! surfaces as a [`ValuationError`]. Provider crates convert their own errors
//! into [`ValuationError::Upstream`] or one of the lookup variants at the
//! capability boundary.

use thiserror::Error;

use crate::types::LineItem;

/// The main error type for valuation operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    /// A ticker, page element or other requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A recognised line item is absent from a financial statement.
    #[error("{item} not found in {statement}")]
    MissingField {
        /// Statement that was searched (e.g. "income statement").
        statement: &'static str,
        /// The absent line item.
        item: LineItem,
    },

    /// The statement exists but reports no periods at all.
    #[error("No data available: {0}")]
    NoDataAvailable(String),

    /// A series is shorter than the calculation requires.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Perpetual growth must stay strictly below the discount rate.
    #[error(
        "Invalid rates: perpetual_growth_rate ({:.2}%) must be less than discount_rate ({:.2}%)",
        .perpetual_growth_rate * 100.0,
        .discount_rate * 100.0
    )]
    InvalidRateRelationship {
        /// Requested perpetual growth rate (fractional).
        perpetual_growth_rate: f64,
        /// Requested discount rate (fractional).
        discount_rate: f64,
    },

    /// A caller-supplied parameter is out of range or malformed.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A ratio would divide by zero.
    #[error("Division undefined: {0} is zero")]
    DivisionUndefined(&'static str),

    /// A growth rate has no real value (negative ratio under a fractional root).
    #[error("Growth undefined between {oldest} and {newest}")]
    UndefinedGrowth {
        /// Most recent value of the series.
        newest: i64,
        /// Oldest value of the truncated series.
        oldest: i64,
    },

    /// Network, HTTP or parsing failure in a data provider.
    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl ValuationError {
    /// Shorthand for a missing line item.
    #[must_use]
    pub const fn missing(statement: &'static str, item: LineItem) -> Self {
        Self::MissingField { statement, item }
    }

    /// Whether the error describes data that could not be located.
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::MissingField { .. } | Self::NoDataAvailable(_)
        )
    }
}

/// A specialized Result type for valuation operations.
pub type Result<T> = std::result::Result<T, ValuationError>;
