//! Two-stage discounted cash flow valuation.
//!
//! Stage one projects `base_fcf` forward at `growth_rate` for `years` and
//! discounts each year at `discount_rate`. Stage two is a Gordon-growth
//! terminal value on the final projected year, discounted back from the
//! horizon. The enterprise value is bridged to equity with cash and debt from
//! the latest balance sheet and divided over the shares outstanding.

use intrinsic_traits::{DcfParameters, DcfValuation, LineItem, Result, StatementTable, ValuationError};
use serde::{Deserialize, Serialize};

use crate::round::round_to;

/// Balance-sheet and share figures that turn enterprise value into a per-share value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityBridge {
    /// Cash and cash equivalents.
    pub cash_and_equivalents: f64,
    /// Total debt.
    pub total_debt: f64,
    /// Shares outstanding.
    pub shares_outstanding: f64,
}

impl EquityBridge {
    /// Read cash and debt from the latest balance sheet.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::MissingField`] if either line item is absent.
    pub fn from_balance_sheet(balance_sheet: &StatementTable, shares_outstanding: f64) -> Result<Self> {
        Ok(Self {
            cash_and_equivalents: balance_sheet.require_latest(LineItem::CashAndCashEquivalents)?,
            total_debt: balance_sheet.require_latest(LineItem::TotalDebt)?,
            shares_outstanding,
        })
    }
}

/// Intermediate values of a DCF valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcfBreakdown {
    /// Sum of the discounted projected cash flows.
    pub pv_projected_fcf: f64,
    /// Terminal value at the horizon.
    pub terminal_value: f64,
    /// Terminal value discounted to today.
    pub pv_terminal_value: f64,
    /// `pv_projected_fcf + pv_terminal_value`.
    pub enterprise_value: f64,
    /// Enterprise value plus cash minus debt.
    pub equity_value: f64,
    /// Equity value per share, rounded to cents.
    pub intrinsic_value_per_share: f64,
}

impl DcfBreakdown {
    /// Run the valuation.
    ///
    /// # Errors
    ///
    /// Returns the [`DcfParameters::validate`] errors,
    /// [`ValuationError::DivisionUndefined`] when shares outstanding or the
    /// discount factor is zero, and [`ValuationError::InvalidParameter`] when
    /// the result does not fit in an `f64`.
    pub fn calculate(params: &DcfParameters, bridge: &EquityBridge) -> Result<Self> {
        params.validate()?;
        if bridge.shares_outstanding == 0.0 {
            return Err(ValuationError::DivisionUndefined("shares outstanding"));
        }

        let growth = 1.0 + params.growth_rate;
        let discount = 1.0 + params.discount_rate;
        if discount == 0.0 {
            return Err(ValuationError::DivisionUndefined("discount factor"));
        }
        // Each year's present value is base * (growth / discount)^t.
        let ratio = growth / discount;
        let horizon = i32::try_from(params.years).map_err(|_| {
            ValuationError::InvalidParameter(format!("years out of range: {}", params.years))
        })?;

        let pv_projected_fcf: f64 = (1..=horizon).map(|t| params.base_fcf * ratio.powi(t)).sum();

        let spread = params.discount_rate - params.perpetual_growth_rate;
        let terminal_value =
            params.base_fcf * growth.powi(horizon) * (1.0 + params.perpetual_growth_rate) / spread;
        let pv_terminal_value =
            params.base_fcf * ratio.powi(horizon) * (1.0 + params.perpetual_growth_rate) / spread;

        let enterprise_value = pv_projected_fcf + pv_terminal_value;
        let equity_value = enterprise_value + bridge.cash_and_equivalents - bridge.total_debt;
        let intrinsic_value_per_share = round_to(equity_value / bridge.shares_outstanding, 2);

        let breakdown = Self {
            pv_projected_fcf,
            terminal_value,
            pv_terminal_value,
            enterprise_value,
            equity_value,
            intrinsic_value_per_share,
        };
        if !breakdown.is_finite() {
            return Err(ValuationError::InvalidParameter(
                "parameters produce a non-finite valuation".to_string(),
            ));
        }
        Ok(breakdown)
    }

    /// Whether every value is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [
            self.pv_projected_fcf,
            self.terminal_value,
            self.pv_terminal_value,
            self.enterprise_value,
            self.equity_value,
            self.intrinsic_value_per_share,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// The per-share result, optionally with the 30% margin of safety.
    #[must_use]
    pub fn valuation(&self, margin_of_safety: bool) -> DcfValuation {
        let valuation = DcfValuation::new(self.intrinsic_value_per_share);
        if margin_of_safety {
            valuation.with_margin_of_safety()
        } else {
            valuation
        }
    }
}
