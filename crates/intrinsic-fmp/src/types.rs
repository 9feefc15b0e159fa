//! Data types for FMP API responses.
//!
//! Statement fields are optional: FMP omits or nulls line items a company
//! does not report, and the valuation engine must be able to tell an absent
//! line item from a zero.

use intrinsic_traits::{LineItem, StatementKind, StatementTable};
use serde::{Deserialize, Serialize};

/// Reporting period for financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Annual reports (10-K filings).
    #[default]
    Annual,
    /// Quarterly reports (10-Q filings).
    Quarter,
}

impl Period {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

/// A statement response that can be folded into a [`StatementTable`].
pub trait StatementRow {
    /// The statement kind the row belongs to.
    const KIND: StatementKind;

    /// Period end date, `YYYY-MM-DD`.
    fn date(&self) -> &str;

    /// Recognised line items of this period.
    fn line_items(&self) -> Vec<(LineItem, Option<f64>)>;
}

/// Fold FMP statement rows into a [`StatementTable`], most recent period first.
#[must_use]
pub fn statement_table<R: StatementRow>(rows: &[R]) -> StatementTable {
    let mut sorted: Vec<&R> = rows.iter().collect();
    // ISO dates sort lexicographically.
    sorted.sort_by(|a, b| b.date().cmp(a.date()));

    let mut table = StatementTable::new(R::KIND);
    for row in sorted {
        table.push_period(row.date(), row.line_items());
    }
    table
}

/// Income statement data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// Period end date.
    pub date: String,
    /// Ticker symbol.
    #[serde(default)]
    pub symbol: String,
    /// Reporting period (FY/Q1..Q4).
    #[serde(default)]
    pub period: String,
    /// Total revenue.
    #[serde(default)]
    pub revenue: Option<f64>,
    /// Interest expense.
    #[serde(default)]
    pub interest_expense: Option<f64>,
    /// Income before tax.
    #[serde(default)]
    pub income_before_tax: Option<f64>,
    /// Income tax expense (tax provision).
    #[serde(default)]
    pub income_tax_expense: Option<f64>,
    /// Net income.
    #[serde(default)]
    pub net_income: Option<f64>,
    /// Earnings per share (diluted).
    #[serde(default)]
    pub eps_diluted: Option<f64>,
}

impl StatementRow for IncomeStatement {
    const KIND: StatementKind = StatementKind::IncomeStatement;

    fn date(&self) -> &str {
        &self.date
    }

    fn line_items(&self) -> Vec<(LineItem, Option<f64>)> {
        vec![
            (LineItem::InterestExpense, self.interest_expense),
            (LineItem::PretaxIncome, self.income_before_tax),
            (LineItem::TaxProvision, self.income_tax_expense),
            (LineItem::NetIncome, self.net_income),
            (LineItem::DilutedEps, self.eps_diluted),
        ]
    }
}

/// Balance sheet data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    /// Period end date.
    pub date: String,
    /// Ticker symbol.
    #[serde(default)]
    pub symbol: String,
    /// Reporting period.
    #[serde(default)]
    pub period: String,
    /// Cash and cash equivalents.
    #[serde(default)]
    pub cash_and_cash_equivalents: Option<f64>,
    /// Total debt.
    #[serde(default)]
    pub total_debt: Option<f64>,
    /// Total stockholders' equity.
    #[serde(default)]
    pub total_stockholders_equity: Option<f64>,
}

impl StatementRow for BalanceSheet {
    const KIND: StatementKind = StatementKind::BalanceSheet;

    fn date(&self) -> &str {
        &self.date
    }

    fn line_items(&self) -> Vec<(LineItem, Option<f64>)> {
        vec![
            (LineItem::TotalDebt, self.total_debt),
            (LineItem::CashAndCashEquivalents, self.cash_and_cash_equivalents),
        ]
    }
}

/// Cash flow statement data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    /// Period end date.
    pub date: String,
    /// Ticker symbol.
    #[serde(default)]
    pub symbol: String,
    /// Reporting period.
    #[serde(default)]
    pub period: String,
    /// Operating cash flow.
    #[serde(default)]
    pub operating_cash_flow: Option<f64>,
    /// Capital expenditure (negative).
    #[serde(default)]
    pub capital_expenditure: Option<f64>,
    /// Free cash flow.
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
}

impl StatementRow for CashFlowStatement {
    const KIND: StatementKind = StatementKind::CashFlow;

    fn date(&self) -> &str {
        &self.date
    }

    fn line_items(&self) -> Vec<(LineItem, Option<f64>)> {
        let derived = match (self.operating_cash_flow, self.capital_expenditure) {
            (Some(ocf), Some(capex)) => Some(ocf + capex),
            _ => None,
        };
        vec![(LineItem::FreeCashFlow, self.free_cash_flow.or(derived))]
    }
}

/// Real-time quote data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub name: String,
    /// Current price.
    pub price: f64,
    /// Market cap.
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Previous close.
    #[serde(default)]
    pub previous_close: Option<f64>,
}

/// Company profile from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub company_name: String,
    /// Equity beta.
    #[serde(default)]
    pub beta: Option<f64>,
    /// Market capitalization.
    #[serde(default)]
    pub market_cap: Option<f64>,
}

/// Share float data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharesFloat {
    /// Ticker symbol.
    pub symbol: String,
    /// Float shares.
    #[serde(default)]
    pub float_shares: Option<f64>,
    /// Shares outstanding.
    #[serde(default)]
    pub outstanding_shares: Option<f64>,
}

/// Daily treasury yield curve from FMP, in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryRates {
    /// Observation date.
    pub date: String,
    /// 3-month yield.
    #[serde(default)]
    pub month3: Option<f64>,
    /// 2-year yield.
    #[serde(default)]
    pub year2: Option<f64>,
    /// 10-year yield.
    #[serde(default)]
    pub year10: Option<f64>,
    /// 30-year yield.
    #[serde(default)]
    pub year30: Option<f64>,
}

/// Historical price data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPrice {
    /// Date.
    pub date: String,
    /// Open price.
    #[serde(default)]
    pub open: f64,
    /// High price.
    #[serde(default)]
    pub high: f64,
    /// Low price.
    #[serde(default)]
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Volume.
    #[serde(default)]
    pub volume: f64,
}
