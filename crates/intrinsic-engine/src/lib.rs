#![doc(issue_tracker_base_url = "https://github.com/factordynamics/intrinsic/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Valuation engine for Intrinsic.
//!
//! The formula modules are pure functions over plain numbers and
//! [`StatementTable`](intrinsic_traits::StatementTable)s:
//!
//! - [`cagr`]: compound annual growth of a free cash flow series
//! - [`capm`]: cost of equity from risk-free rate, beta and risk premium
//! - [`wacc`]: weighted average cost of capital
//! - [`fcf`]: base and historical free cash flow
//! - [`dcf`]: two-stage discounted cash flow per share
//! - [`price`]: historical close selection
//!
//! [`Valuator`] wires them to the data-provider traits.
//!
//! # Example
//!
//! ```rust,ignore
//! use intrinsic_engine::dcf::{DcfBreakdown, EquityBridge};
//! use intrinsic_traits::DcfParameters;
//!
//! let params = DcfParameters {
//!     base_fcf: 100.0,
//!     growth_rate: 0.05,
//!     perpetual_growth_rate: 0.02,
//!     discount_rate: 0.08,
//!     years: 5,
//! };
//! let bridge = EquityBridge { cash_and_equivalents: 0.0, total_debt: 0.0, shares_outstanding: 1.0 };
//! let value = DcfBreakdown::calculate(&params, &bridge)?.intrinsic_value_per_share;
//! ```

pub mod cagr;
pub mod capm;
pub mod dcf;
pub mod fcf;
pub mod price;
pub mod round;
pub mod valuator;
pub mod wacc;

pub use cagr::{DEFAULT_TIME_PERIOD, compound_annual_growth};
pub use capm::{CapmAssumptions, CapmEstimate, capm};
pub use dcf::{DcfBreakdown, EquityBridge};
pub use fcf::{BASE_FCF_YEARS, base_fcf, past_fcf};
pub use round::round_to;
pub use valuator::{ValuationReport, Valuator};
pub use wacc::{WaccBreakdown, WaccInputs};
