//! Selection of historical closes for requested calendar dates.

use std::collections::HashMap;

use intrinsic_traits::{DATE_FORMAT, Date, PricePoint};

/// Parse the requested date strings, dropping the ones that are not `YYYY-MM-DD`.
#[must_use]
pub fn parse_requested(dates: &[String]) -> Vec<Date> {
    dates
        .iter()
        .filter_map(|d| Date::parse_from_str(d.trim(), DATE_FORMAT).ok())
        .collect()
}

/// Smallest window covering every parseable requested date.
#[must_use]
pub fn requested_window(dates: &[Date]) -> Option<(Date, Date)> {
    let from = dates.iter().min()?;
    let to = dates.iter().max()?;
    Some((*from, *to))
}

/// Closes for the requested dates, in request order.
///
/// Dates with no close in `history` (weekends, holidays, typos) are left out.
#[must_use]
pub fn select_requested(history: &[PricePoint], requested: &[Date]) -> Vec<PricePoint> {
    let closes: HashMap<Date, f64> = history
        .iter()
        .filter_map(|p| p.parsed_date().map(|d| (d, p.price)))
        .collect();

    requested
        .iter()
        .filter_map(|date| {
            closes
                .get(date)
                .map(|price| PricePoint::new(date.format(DATE_FORMAT).to_string(), *price))
        })
        .collect()
}
