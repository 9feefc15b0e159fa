//! Weighted average cost of capital.

use intrinsic_traits::{LineItem, Result, StatementTable, ValuationError};
use serde::{Deserialize, Serialize};

use crate::round::round_to;

/// Latest-period figures the WACC is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaccInputs {
    /// Market capitalization.
    pub market_cap: f64,
    /// Total debt from the balance sheet.
    pub total_debt: f64,
    /// Interest expense from the income statement.
    pub interest_expense: f64,
    /// Income tax provision from the income statement.
    pub tax_provision: f64,
    /// Income before tax from the income statement.
    pub pretax_income: f64,
}

impl WaccInputs {
    /// Pull the inputs out of the latest balance sheet and income statement.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::MissingField`] for any absent line item.
    pub fn from_statements(
        market_cap: f64,
        balance_sheet: &StatementTable,
        income_statement: &StatementTable,
    ) -> Result<Self> {
        Ok(Self {
            market_cap,
            total_debt: balance_sheet.require_latest(LineItem::TotalDebt)?,
            interest_expense: income_statement.require_latest(LineItem::InterestExpense)?,
            tax_provision: income_statement.require_latest(LineItem::TaxProvision)?,
            pretax_income: income_statement.require_latest(LineItem::PretaxIncome)?,
        })
    }
}

/// WACC with its intermediate ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaccBreakdown {
    /// Cost of equity supplied by the caller, usually a CAPM estimate.
    pub cost_of_equity: f64,
    /// `interest_expense / total_debt`.
    pub cost_of_debt: f64,
    /// `tax_provision / pretax_income`.
    pub corporate_tax_rate: f64,
    /// `market_cap / (market_cap + total_debt)`.
    pub weight_equity: f64,
    /// `total_debt / (market_cap + total_debt)`.
    pub weight_debt: f64,
    /// The blended rate, rounded to 3 decimals.
    pub wacc: f64,
}

impl WaccBreakdown {
    /// Blend the cost of equity and the after-tax cost of debt.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::DivisionUndefined`] when total debt, firm
    /// value or pre-tax income is zero.
    pub fn calculate(inputs: &WaccInputs, cost_of_equity: f64) -> Result<Self> {
        if inputs.total_debt == 0.0 {
            return Err(ValuationError::DivisionUndefined("total debt"));
        }
        let total_firm_value = inputs.market_cap + inputs.total_debt;
        if total_firm_value == 0.0 {
            return Err(ValuationError::DivisionUndefined("total firm value"));
        }
        if inputs.pretax_income == 0.0 {
            return Err(ValuationError::DivisionUndefined("pretax income"));
        }

        let cost_of_debt = inputs.interest_expense / inputs.total_debt;
        let corporate_tax_rate = inputs.tax_provision / inputs.pretax_income;
        let weight_equity = inputs.market_cap / total_firm_value;
        let weight_debt = inputs.total_debt / total_firm_value;

        let wacc = weight_equity * cost_of_equity
            + weight_debt * cost_of_debt * (1.0 - corporate_tax_rate);

        Ok(Self {
            cost_of_equity,
            cost_of_debt,
            corporate_tax_rate,
            weight_equity,
            weight_debt,
            wacc: round_to(wacc, 3),
        })
    }
}
