//! Capital Asset Pricing Model.

use serde::{Deserialize, Serialize};

/// Market assumptions used when estimating the cost of equity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmAssumptions {
    /// Risk-free rate used when no treasury yield is available (fractional).
    pub fallback_risk_free_rate: f64,
    /// Beta used when the provider reports none.
    pub default_beta: f64,
    /// Expected market return above the risk-free rate (fractional).
    pub equity_risk_premium: f64,
}

impl Default for CapmAssumptions {
    fn default() -> Self {
        Self {
            fallback_risk_free_rate: 0.045,
            default_beta: 1.0,
            equity_risk_premium: 0.055,
        }
    }
}

/// A cost-of-equity estimate with the inputs it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmEstimate {
    /// Risk-free rate (fractional).
    pub risk_free_rate: f64,
    /// Equity beta.
    pub beta: f64,
    /// Equity risk premium (fractional).
    pub equity_risk_premium: f64,
    /// `risk_free_rate + beta × equity_risk_premium`.
    pub cost_of_equity: f64,
}

impl CapmEstimate {
    /// Estimate the cost of equity from raw provider figures.
    ///
    /// # Arguments
    ///
    /// * `treasury_yield_percent` - latest 10-year treasury yield in percent, if known
    /// * `beta` - provider beta, if known
    /// * `assumptions` - defaults for whatever is missing
    #[must_use]
    pub fn calculate(
        treasury_yield_percent: Option<f64>,
        beta: Option<f64>,
        assumptions: &CapmAssumptions,
    ) -> Self {
        let risk_free_rate = treasury_yield_percent
            .filter(|y| y.is_finite())
            .map_or(assumptions.fallback_risk_free_rate, |y| y / 100.0);
        let beta = beta
            .filter(|b| b.is_finite())
            .unwrap_or(assumptions.default_beta);

        Self {
            risk_free_rate,
            beta,
            equity_risk_premium: assumptions.equity_risk_premium,
            cost_of_equity: capm(risk_free_rate, beta, assumptions.equity_risk_premium),
        }
    }
}

/// Expected return on equity: `risk_free_rate + beta × equity_risk_premium`.
#[must_use]
pub const fn capm(risk_free_rate: f64, beta: f64, equity_risk_premium: f64) -> f64 {
    risk_free_rate + beta * equity_risk_premium
}
