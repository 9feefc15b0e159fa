//! Compound annual growth rate of free cash flow.

use intrinsic_traits::{CagrResult, Result, ValuationError};

use crate::round::round_to;

/// Default number of annual values the growth rate spans.
pub const DEFAULT_TIME_PERIOD: usize = 5;

/// Compound annual growth over the `time_period` most recent values.
///
/// `series` is ordered most recent first. The rate is
/// `(newest / oldest)^(1/n) - 1` where `n` is the number of values kept after
/// truncation, and is rounded to 3 decimals.
///
/// # Errors
///
/// - [`ValuationError::InvalidParameter`] if `time_period` is zero
/// - [`ValuationError::InsufficientData`] if fewer than two values remain
/// - [`ValuationError::DivisionUndefined`] if the oldest value is zero
/// - [`ValuationError::UndefinedGrowth`] if the ratio is not positive
pub fn compound_annual_growth(series: &[i64], time_period: usize) -> Result<CagrResult> {
    if time_period == 0 {
        return Err(ValuationError::InvalidParameter(
            "time_period must be at least 1".to_string(),
        ));
    }

    let window = &series[..series.len().min(time_period)];
    let [newest, .., oldest] = *window else {
        return Err(ValuationError::InsufficientData(format!(
            "growth needs at least 2 annual values, found {}",
            window.len()
        )));
    };

    if oldest == 0 {
        return Err(ValuationError::DivisionUndefined("oldest free cash flow"));
    }

    let ratio = newest as f64 / oldest as f64;
    if ratio <= 0.0 {
        return Err(ValuationError::UndefinedGrowth { newest, oldest });
    }

    let cagr = ratio.powf(1.0 / window.len() as f64) - 1.0;
    Ok(CagrResult {
        cagr: round_to(cagr, 3),
        latest_fcf: newest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_three_year_growth() {
        let result = compound_annual_growth(&[121, 110, 100], 3).unwrap();
        // (121 / 100)^(1/3) - 1
        assert_relative_eq!(result.cagr, 0.066, epsilon = 1e-12);
        assert_eq!(result.formatted(), "0.066");
        assert_eq!(result.latest_fcf, 121);
    }

    #[test]
    fn test_truncates_to_time_period() {
        let series = [200, 100, 1, 1, 1];
        let result = compound_annual_growth(&series, 2).unwrap();
        // sqrt(2) - 1
        assert_relative_eq!(result.cagr, 0.414, epsilon = 1e-12);

        // A longer period than the series uses the whole series.
        let result = compound_annual_growth(&[121, 110, 100], 10).unwrap();
        assert_relative_eq!(result.cagr, 0.066, epsilon = 1e-12);
    }

    #[test]
    fn test_shrinking_cash_flow() {
        let result = compound_annual_growth(&[50, 100], 5).unwrap();
        assert_relative_eq!(result.cagr, -0.293, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_time_period() {
        assert!(matches!(
            compound_annual_growth(&[1, 2, 3], 0),
            Err(ValuationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_insufficient_data() {
        assert!(matches!(
            compound_annual_growth(&[100], 5),
            Err(ValuationError::InsufficientData(_))
        ));
        assert!(matches!(
            compound_annual_growth(&[], 5),
            Err(ValuationError::InsufficientData(_))
        ));
        assert!(matches!(
            compound_annual_growth(&[100, 90, 80], 1),
            Err(ValuationError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_zero_anchor() {
        assert_eq!(
            compound_annual_growth(&[100, 0], 2),
            Err(ValuationError::DivisionUndefined("oldest free cash flow"))
        );
    }

    #[test]
    fn test_sign_change() {
        assert_eq!(
            compound_annual_growth(&[100, 50, -20], 3),
            Err(ValuationError::UndefinedGrowth {
                newest: 100,
                oldest: -20
            })
        );
        // Both negative gives a positive ratio, which is defined.
        assert!(compound_annual_growth(&[-50, -100], 2).is_ok());
    }
}
