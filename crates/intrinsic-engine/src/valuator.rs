//! Provider-backed valuation operations.
//!
//! [`Valuator`] fetches the inputs each formula needs from a
//! [`MarketDataProvider`] and an [`FcfHistorySource`], then runs the pure
//! calculations from the sibling modules. Every call fetches fresh data; nothing
//! is cached between calls.

use std::{fmt, sync::Arc};

use intrinsic_traits::{
    COMPANY_PROFILE, CagrResult, DcfParameters, DcfValuation, FcfHistorySource, LineItem,
    MarketDataProvider, PricePoint, Result, Ticker, ValuationError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    cagr::compound_annual_growth,
    capm::{CapmAssumptions, CapmEstimate},
    dcf::{DcfBreakdown, EquityBridge},
    fcf::{base_fcf, past_fcf},
    price::{parse_requested, requested_window, select_requested},
    wacc::{WaccBreakdown, WaccInputs},
};

/// Every intermediate value of a full CAPM → WACC → base FCF → DCF run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    /// The valued company.
    pub ticker: Ticker,
    /// Cost of equity estimate.
    pub capm: CapmEstimate,
    /// Discount rate derivation.
    pub wacc: WaccBreakdown,
    /// Starting free cash flow.
    pub base_fcf: f64,
    /// Inputs handed to the DCF.
    pub parameters: DcfParameters,
    /// DCF intermediate values.
    pub dcf: DcfBreakdown,
    /// Per-share result with the margin of safety.
    pub valuation: DcfValuation,
}

/// Runs valuation operations against live or fixture providers.
#[derive(Clone)]
pub struct Valuator {
    market: Arc<dyn MarketDataProvider>,
    fcf_history: Arc<dyn FcfHistorySource>,
    assumptions: CapmAssumptions,
}

impl fmt::Debug for Valuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Valuator")
            .field("market", &self.market.name())
            .field("fcf_history", &self.fcf_history.name())
            .field("assumptions", &self.assumptions)
            .finish()
    }
}

impl Valuator {
    /// Create a valuator with the default CAPM assumptions.
    #[must_use]
    pub fn new(market: Arc<dyn MarketDataProvider>, fcf_history: Arc<dyn FcfHistorySource>) -> Self {
        Self {
            market,
            fcf_history,
            assumptions: CapmAssumptions::default(),
        }
    }

    /// Override the CAPM assumptions.
    #[must_use]
    pub const fn with_capm_assumptions(mut self, assumptions: CapmAssumptions) -> Self {
        self.assumptions = assumptions;
        self
    }

    /// The CAPM assumptions in use.
    #[must_use]
    pub const fn capm_assumptions(&self) -> &CapmAssumptions {
        &self.assumptions
    }

    /// Current spot price.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::NotFound`] if the ticker has no price data.
    pub async fn price(&self, ticker: &Ticker) -> Result<f64> {
        debug!(ticker = %ticker, provider = self.market.name(), "price lookup");
        self.market.spot_price(ticker).await
    }

    /// Closing prices on the requested dates, in request order.
    ///
    /// Unparseable dates and dates without a close are omitted. An empty
    /// result is not an error.
    ///
    /// # Errors
    ///
    /// Propagates provider failures.
    pub async fn historical_prices(&self, ticker: &Ticker, dates: &[String]) -> Result<Vec<PricePoint>> {
        let requested = parse_requested(dates);
        let Some((from, to)) = requested_window(&requested) else {
            debug!(ticker = %ticker, "no parseable dates requested");
            return Ok(Vec::new());
        };

        let history = self.market.price_history(ticker, from, to).await?;
        let points = select_requested(&history, &requested);
        debug!(
            ticker = %ticker,
            requested = dates.len(),
            matched = points.len(),
            "historical price lookup"
        );
        Ok(points)
    }

    /// Reported free cash flows, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::MissingField`] if the provider reports no
    /// free cash flow row.
    pub async fn past_fcf(&self, ticker: &Ticker) -> Result<Vec<f64>> {
        let cash_flow = self.market.cash_flow_statement(ticker).await?;
        past_fcf(&cash_flow)
    }

    /// Compound annual growth of scraped free cash flow.
    ///
    /// # Errors
    ///
    /// See [`compound_annual_growth`]; `time_period == 0` is rejected before
    /// the page is fetched.
    pub async fn cagr(&self, ticker: &Ticker, company: &str, time_period: usize) -> Result<CagrResult> {
        if time_period == 0 {
            return Err(ValuationError::InvalidParameter(
                "time_period must be at least 1".to_string(),
            ));
        }
        debug!(ticker = %ticker, company, time_period, source = self.fcf_history.name(), "cagr");
        let series = self.fcf_history.annual_free_cash_flow(ticker, company).await?;
        compound_annual_growth(&series, time_period)
    }

    /// Cost of equity with its inputs.
    ///
    /// A missing beta or treasury yield falls back to the configured
    /// assumptions. A failed treasury lookup also falls back.
    ///
    /// # Errors
    ///
    /// Propagates failures of the beta lookup.
    pub async fn capm_estimate(&self, ticker: &Ticker) -> Result<CapmEstimate> {
        let beta = self.market.beta(ticker).await?;
        let treasury = match self.market.treasury_yield_10y().await {
            Ok(yield_10y) => yield_10y,
            Err(err) => {
                warn!(error = %err, "treasury yield unavailable, using fallback risk-free rate");
                None
            }
        };
        let estimate = CapmEstimate::calculate(treasury, beta, &self.assumptions);
        debug!(
            ticker = %ticker,
            risk_free_rate = estimate.risk_free_rate,
            beta = estimate.beta,
            capm = estimate.cost_of_equity,
            "capm"
        );
        Ok(estimate)
    }

    /// Expected return on equity.
    ///
    /// # Errors
    ///
    /// See [`capm_estimate`](Self::capm_estimate).
    pub async fn capm(&self, ticker: &Ticker) -> Result<f64> {
        Ok(self.capm_estimate(ticker).await?.cost_of_equity)
    }

    /// WACC with its intermediate ratios.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidParameter`] for a non-finite `capm`,
    /// [`ValuationError::MissingField`] for absent inputs and
    /// [`ValuationError::DivisionUndefined`] for zero denominators.
    pub async fn wacc_breakdown(&self, ticker: &Ticker, capm: f64) -> Result<WaccBreakdown> {
        if !capm.is_finite() {
            return Err(ValuationError::InvalidParameter("capm must be finite".to_string()));
        }

        let market_cap = self
            .market
            .market_cap(ticker)
            .await?
            .ok_or_else(|| ValuationError::missing(COMPANY_PROFILE, LineItem::MarketCap))?;
        let balance_sheet = self.market.balance_sheet(ticker).await?;
        let income_statement = self.market.income_statement(ticker).await?;

        let inputs = WaccInputs::from_statements(market_cap, &balance_sheet, &income_statement)?;
        let breakdown = WaccBreakdown::calculate(&inputs, capm)?;
        debug!(ticker = %ticker, wacc = breakdown.wacc, "wacc");
        Ok(breakdown)
    }

    /// Weighted average cost of capital, rounded to 3 decimals.
    ///
    /// # Errors
    ///
    /// See [`wacc_breakdown`](Self::wacc_breakdown).
    pub async fn wacc(&self, ticker: &Ticker, capm: f64) -> Result<f64> {
        Ok(self.wacc_breakdown(ticker, capm).await?.wacc)
    }

    /// Starting free cash flow for a projection.
    ///
    /// # Errors
    ///
    /// See [`base_fcf`].
    pub async fn base_fcf(&self, ticker: &Ticker) -> Result<f64> {
        let cash_flow = self.market.cash_flow_statement(ticker).await?;
        base_fcf(&cash_flow)
    }

    /// Diluted EPS of the latest annual income statement.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::MissingField`] if the latest statement does
    /// not report diluted EPS.
    pub async fn eps(&self, ticker: &Ticker) -> Result<f64> {
        let income_statement = self.market.income_statement(ticker).await?;
        income_statement.require_latest(LineItem::DilutedEps)
    }

    /// DCF intermediate values.
    ///
    /// The parameters are validated before any data is fetched.
    ///
    /// # Errors
    ///
    /// Returns the [`DcfParameters::validate`] errors,
    /// [`ValuationError::MissingField`] for absent balance-sheet items or share
    /// count, and [`ValuationError::DivisionUndefined`] for zero shares.
    pub async fn dcf_breakdown(&self, ticker: &Ticker, params: &DcfParameters) -> Result<DcfBreakdown> {
        params.validate()?;

        let balance_sheet = self.market.balance_sheet(ticker).await?;
        let shares = self
            .market
            .shares_outstanding(ticker)
            .await?
            .ok_or_else(|| ValuationError::missing(COMPANY_PROFILE, LineItem::SharesOutstanding))?;

        let bridge = EquityBridge::from_balance_sheet(&balance_sheet, shares)?;
        let breakdown = DcfBreakdown::calculate(params, &bridge)?;
        debug!(
            ticker = %ticker,
            value_per_share = breakdown.intrinsic_value_per_share,
            "dcf"
        );
        Ok(breakdown)
    }

    /// Intrinsic value per share, optionally with the 30% margin of safety.
    ///
    /// # Errors
    ///
    /// See [`dcf_breakdown`](Self::dcf_breakdown).
    pub async fn dcf(&self, ticker: &Ticker, params: &DcfParameters, margin_of_safety: bool) -> Result<DcfValuation> {
        Ok(self.dcf_breakdown(ticker, params).await?.valuation(margin_of_safety))
    }

    /// Full pipeline: CAPM, then WACC as the discount rate, then base FCF, then DCF.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidParameter`] for `years == 0` or
    /// non-finite growth rates before any fetch, and any error of the chained
    /// steps, including [`ValuationError::InvalidRateRelationship`] when the
    /// perpetual growth rate is not below the computed WACC.
    pub async fn valuation_report(
        &self,
        ticker: &Ticker,
        growth_rate: f64,
        perpetual_growth_rate: f64,
        years: u32,
    ) -> Result<ValuationReport> {
        if years == 0 {
            return Err(ValuationError::InvalidParameter(
                "years must be a positive integer".to_string(),
            ));
        }
        if !growth_rate.is_finite() || !perpetual_growth_rate.is_finite() {
            return Err(ValuationError::InvalidParameter(
                "growth rates must be finite".to_string(),
            ));
        }

        let capm = self.capm_estimate(ticker).await?;
        let wacc = self.wacc_breakdown(ticker, capm.cost_of_equity).await?;
        let base = self.base_fcf(ticker).await?;

        let parameters = DcfParameters {
            base_fcf: base,
            growth_rate,
            perpetual_growth_rate,
            discount_rate: wacc.wacc,
            years,
        };
        let dcf = self.dcf_breakdown(ticker, &parameters).await?;

        Ok(ValuationReport {
            ticker: ticker.clone(),
            capm,
            wacc,
            base_fcf: base,
            parameters,
            valuation: dcf.valuation(true),
            dcf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use intrinsic_traits::{FixtureCompany, FixtureProvider, StatementKind, StatementTable};

    fn acme() -> FixtureCompany {
        FixtureCompany {
            prices: vec![
                PricePoint::new("2024-01-02", 100.0),
                PricePoint::new("2024-01-03", 102.0),
                PricePoint::new("2024-01-04", 101.0),
            ],
            balance_sheet: StatementTable::new(StatementKind::BalanceSheet).with_period(
                "2024-12-31",
                [
                    (LineItem::TotalDebt, Some(200.0)),
                    (LineItem::CashAndCashEquivalents, Some(50.0)),
                ],
            ),
            income_statement: StatementTable::new(StatementKind::IncomeStatement).with_period(
                "2024-12-31",
                [
                    (LineItem::InterestExpense, Some(10.0)),
                    (LineItem::TaxProvision, Some(21.0)),
                    (LineItem::PretaxIncome, Some(100.0)),
                    (LineItem::DilutedEps, Some(3.25)),
                ],
            ),
            cash_flow: StatementTable::new(StatementKind::CashFlow)
                .with_period("2024-12-31", [(LineItem::FreeCashFlow, Some(30.0))])
                .with_period("2023-12-31", [(LineItem::FreeCashFlow, Some(20.0))])
                .with_period("2022-12-31", [(LineItem::FreeCashFlow, Some(10.0))]),
            market_cap: Some(800.0),
            shares_outstanding: Some(10.0),
            beta: Some(1.2),
            fcf_history: vec![121, 110, 100],
        }
    }

    fn valuator(provider: FixtureProvider) -> Valuator {
        let provider = Arc::new(provider);
        Valuator::new(provider.clone(), provider)
    }

    fn ticker() -> Ticker {
        Ticker::new("ACME").unwrap()
    }

    fn fixture() -> Valuator {
        valuator(
            FixtureProvider::new()
                .with_company(ticker(), acme())
                .with_treasury_yield(4.0),
        )
    }

    #[tokio::test]
    async fn test_capm_uses_treasury_and_beta() {
        let capm = fixture().capm(&ticker()).await.unwrap();
        assert_relative_eq!(capm, 0.04 + 1.2 * 0.055, epsilon = 1e-12);
    }

    #[tokio::test]
    async fn test_capm_fallbacks() {
        let company = FixtureCompany { beta: None, ..acme() };
        let v = valuator(FixtureProvider::new().with_company(ticker(), company));
        assert_relative_eq!(v.capm(&ticker()).await.unwrap(), 0.1, epsilon = 1e-12);
    }

    #[tokio::test]
    async fn test_wacc_and_base_fcf() {
        let v = fixture();
        assert_relative_eq!(v.wacc(&ticker(), 0.1).await.unwrap(), 0.088);
        assert_relative_eq!(v.base_fcf(&ticker()).await.unwrap(), 20.0);
        assert_eq!(v.past_fcf(&ticker()).await.unwrap(), vec![30.0, 20.0, 10.0]);
        assert_relative_eq!(v.eps(&ticker()).await.unwrap(), 3.25);
    }

    #[tokio::test]
    async fn test_wacc_without_market_cap() {
        let company = FixtureCompany {
            market_cap: None,
            ..acme()
        };
        let v = valuator(FixtureProvider::new().with_company(ticker(), company));
        assert_eq!(
            v.wacc(&ticker(), 0.1).await,
            Err(ValuationError::missing(COMPANY_PROFILE, LineItem::MarketCap))
        );
    }

    #[tokio::test]
    async fn test_dcf_validates_before_fetching() {
        // Unknown ticker: a fetch would fail with NotFound.
        let v = fixture();
        let unknown = Ticker::new("NOPE").unwrap();
        let params = DcfParameters {
            base_fcf: 20.0,
            growth_rate: 0.05,
            perpetual_growth_rate: 0.09,
            discount_rate: 0.08,
            years: 5,
        };
        assert!(matches!(
            v.dcf(&unknown, &params, false).await,
            Err(ValuationError::InvalidRateRelationship { .. })
        ));
    }

    #[tokio::test]
    async fn test_dcf_per_share() {
        let v = fixture();
        let params = DcfParameters {
            base_fcf: 100.0,
            growth_rate: 0.05,
            perpetual_growth_rate: 0.02,
            discount_rate: 0.08,
            years: 5,
        };
        let valuation = v.dcf(&ticker(), &params, true).await.unwrap();
        // (1936.4916 + 50 - 200) / 10
        assert_relative_eq!(valuation.base_case, 178.65, epsilon = 1e-9);
        assert_eq!(
            valuation.thirty_percent_margin_of_safety,
            Some(valuation.base_case * 0.7)
        );
    }

    #[tokio::test]
    async fn test_dcf_without_share_count() {
        let company = FixtureCompany {
            shares_outstanding: None,
            ..acme()
        };
        let v = valuator(FixtureProvider::new().with_company(ticker(), company));
        let params = DcfParameters {
            base_fcf: 100.0,
            growth_rate: 0.05,
            perpetual_growth_rate: 0.02,
            discount_rate: 0.08,
            years: 5,
        };
        assert_eq!(
            v.dcf(&ticker(), &params, false).await,
            Err(ValuationError::missing(COMPANY_PROFILE, LineItem::SharesOutstanding))
        );
    }

    #[tokio::test]
    async fn test_cagr_from_history_source() {
        let v = fixture();
        let result = v.cagr(&ticker(), "acme", 3).await.unwrap();
        assert_eq!(result.formatted(), "0.066");
        assert_eq!(result.latest_fcf, 121);
        assert!(matches!(
            v.cagr(&ticker(), "acme", 0).await,
            Err(ValuationError::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn test_historical_prices_in_request_order() {
        let v = fixture();
        let dates = vec![
            "2024-01-04".to_string(),
            "2024-01-06".to_string(),
            "garbage".to_string(),
            "2024-01-02".to_string(),
        ];
        let points = v.historical_prices(&ticker(), &dates).await.unwrap();
        assert_eq!(
            points,
            vec![
                PricePoint::new("2024-01-04", 101.0),
                PricePoint::new("2024-01-02", 100.0)
            ]
        );
        assert!(v.historical_prices(&ticker(), &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_price_unknown_ticker() {
        let v = fixture();
        assert!(matches!(
            v.price(&Ticker::new("NOPE").unwrap()).await,
            Err(ValuationError::NotFound(_))
        ));
        assert_relative_eq!(v.price(&ticker()).await.unwrap(), 101.0);
    }

    #[tokio::test]
    async fn test_valuation_report_chains_steps() {
        let v = fixture();
        let report = v.valuation_report(&ticker(), 0.05, 0.02, 5).await.unwrap();

        assert_relative_eq!(report.capm.cost_of_equity, 0.106, epsilon = 1e-12);
        // 0.8 * 0.106 + 0.2 * 0.05 * 0.79 = 0.0927
        assert_relative_eq!(report.wacc.wacc, 0.093);
        assert_relative_eq!(report.parameters.discount_rate, report.wacc.wacc);
        assert_relative_eq!(report.base_fcf, 20.0);
        assert_eq!(
            report.valuation.thirty_percent_margin_of_safety,
            Some(report.valuation.base_case * 0.7)
        );
    }

    #[tokio::test]
    async fn test_valuation_report_rejects_zero_years() {
        let v = fixture();
        assert!(matches!(
            v.valuation_report(&ticker(), 0.05, 0.02, 0).await,
            Err(ValuationError::InvalidParameter(_))
        ));
    }
}
