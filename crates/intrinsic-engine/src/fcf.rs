//! Free cash flow figures from the cash flow statement.

use intrinsic_traits::{LineItem, Result, StatementTable, ValuationError};

use crate::round::round_to;

/// Number of recent years averaged into the base free cash flow.
pub const BASE_FCF_YEARS: usize = 3;

/// The free cash flow row, most recent first.
///
/// # Errors
///
/// Returns [`ValuationError::MissingField`] if the statement has no
/// free cash flow row.
pub fn past_fcf(cash_flow: &StatementTable) -> Result<Vec<f64>> {
    cash_flow
        .row(LineItem::FreeCashFlow)
        .ok_or_else(|| ValuationError::missing(cash_flow.kind().label(), LineItem::FreeCashFlow))
}

/// Starting free cash flow for a DCF projection.
///
/// With three or more reporting periods this is the mean of the values
/// reported in the three most recent periods, rounded to 3 decimals. Gaps are
/// skipped, never filled from older periods. With fewer periods it is the
/// value of the most recent one.
///
/// # Errors
///
/// Returns [`ValuationError::NoDataAvailable`] if the statement has no periods
/// or the three most recent periods report nothing, and
/// [`ValuationError::MissingField`] if the free cash flow row is absent or the
/// single most recent period lacks it.
pub fn base_fcf(cash_flow: &StatementTable) -> Result<f64> {
    if cash_flow.is_empty() {
        return Err(ValuationError::NoDataAvailable(
            "cash flow statement has no periods".to_string(),
        ));
    }
    let columns = cash_flow
        .columns(LineItem::FreeCashFlow)
        .ok_or_else(|| ValuationError::missing(cash_flow.kind().label(), LineItem::FreeCashFlow))?;

    if cash_flow.period_count() < BASE_FCF_YEARS {
        return cash_flow.require_latest(LineItem::FreeCashFlow);
    }

    let recent: Vec<f64> = columns.iter().take(BASE_FCF_YEARS).flatten().copied().collect();
    if recent.is_empty() {
        return Err(ValuationError::NoDataAvailable(format!(
            "no free cash flow in the {BASE_FCF_YEARS} most recent periods"
        )));
    }
    let mean = recent.iter().sum::<f64>() / recent.len() as f64;
    Ok(round_to(mean, 3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use intrinsic_traits::StatementKind;

    fn cash_flow(values: &[f64]) -> StatementTable {
        let mut table = StatementTable::new(StatementKind::CashFlow);
        for (i, v) in values.iter().enumerate() {
            table.push_period(format!("{}-12-31", 2024 - i), [(LineItem::FreeCashFlow, Some(*v))]);
        }
        table
    }

    #[test]
    fn test_mean_of_three_most_recent() {
        let table = cash_flow(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_relative_eq!(base_fcf(&table).unwrap(), 20.0);
    }

    #[test]
    fn test_rounds_mean() {
        let table = cash_flow(&[1.0, 1.0, 2.0]);
        assert_relative_eq!(base_fcf(&table).unwrap(), 1.333);
    }

    #[test]
    fn test_short_series_uses_latest() {
        assert_relative_eq!(base_fcf(&cash_flow(&[10.0, 20.0])).unwrap(), 10.0);
        assert_relative_eq!(base_fcf(&cash_flow(&[7.5])).unwrap(), 7.5);
    }

    fn cash_flow_with_gaps(values: &[Option<f64>]) -> StatementTable {
        let mut table = StatementTable::new(StatementKind::CashFlow);
        for (i, v) in values.iter().enumerate() {
            table.push_period(format!("{}-12-31", 2024 - i), [(LineItem::FreeCashFlow, *v)]);
        }
        table
    }

    #[test]
    fn test_gap_is_not_filled_from_older_periods() {
        let table = cash_flow_with_gaps(&[None, Some(10.0), Some(20.0), Some(30.0)]);
        assert_relative_eq!(base_fcf(&table).unwrap(), 15.0);
    }

    #[test]
    fn test_recent_periods_all_missing() {
        let table = cash_flow_with_gaps(&[None, None, None, Some(30.0)]);
        assert!(matches!(
            base_fcf(&table),
            Err(ValuationError::NoDataAvailable(_))
        ));
    }

    #[test]
    fn test_short_series_reads_latest_period() {
        let table = cash_flow_with_gaps(&[None, Some(20.0)]);
        assert_eq!(
            base_fcf(&table),
            Err(ValuationError::missing("cash flow statement", LineItem::FreeCashFlow))
        );
    }

    #[test]
    fn test_empty_statement() {
        assert!(matches!(
            base_fcf(&cash_flow(&[])),
            Err(ValuationError::NoDataAvailable(_))
        ));
    }

    #[test]
    fn test_missing_row() {
        let table = StatementTable::new(StatementKind::CashFlow)
            .with_period("2024-12-31", [(LineItem::NetIncome, Some(1.0))]);
        assert_eq!(
            base_fcf(&table),
            Err(ValuationError::missing("cash flow statement", LineItem::FreeCashFlow))
        );
        assert!(past_fcf(&table).is_err());
    }

    #[test]
    fn test_past_fcf_order() {
        let table = cash_flow(&[3.0, 2.0, 1.0]);
        assert_eq!(past_fcf(&table).unwrap(), vec![3.0, 2.0, 1.0]);
    }
}
