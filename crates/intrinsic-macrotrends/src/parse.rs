//! HTML parsing of macrotrends free cash flow pages.
//!
//! The page carries an annual table whose header cell reads
//! `"{Name} Annual Free Cash Flow"`. The first `tbody` after that header holds
//! `year | value` cell pairs, most recent year first.

use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

/// Capitalize the first letter of every word and lowercase the rest.
///
/// Any non-alphabetic character starts a new word, so `"meta-platforms"`
/// becomes `"Meta-Platforms"`.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Text of the header cell that introduces the annual table.
#[must_use]
pub fn annual_header(name: &str) -> String {
    format!("{} Annual Free Cash Flow", title_case(name))
}

/// Parse a cell such as `"$4,358"` or `"$-1,219.5"` into whole units.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidValue`] if the cell is not numeric.
pub fn parse_cell(text: &str) -> Result<i64, ScrapeError> {
    let cleaned: String = text.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let integer = cleaned.split('.').next().unwrap_or_default().trim();
    integer
        .parse()
        .map_err(|_| ScrapeError::InvalidValue(text.to_string()))
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{e:?}")))
}

/// Extract annual free cash flows, most recent first.
///
/// # Errors
///
/// Returns [`ScrapeError::HeaderNotFound`] or [`ScrapeError::TableNotFound`]
/// when the page lacks the annual table, and [`ScrapeError::InvalidValue`]
/// for non-numeric value cells.
pub fn parse_annual_fcf(html: &str, name: &str) -> Result<Vec<i64>, ScrapeError> {
    let document = Html::parse_document(html);
    let expected = annual_header(name);

    let th = selector("th")?;
    let header = document
        .select(&th)
        .find(|cell| cell.text().collect::<String>().trim() == expected)
        .ok_or_else(|| ScrapeError::HeaderNotFound(expected.clone()))?;

    // First tbody after the header in document order.
    let tbody = document
        .root_element()
        .descendants()
        .skip_while(|node| node.id() != header.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tbody")
        .ok_or(ScrapeError::TableNotFound)?;

    let td = selector("td")?;
    let cells: Vec<String> = tbody
        .select(&td)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect();

    cells.iter().skip(1).step_by(2).map(|v| parse_cell(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <table class="historical_data_table">
            <thead><tr><th colspan="2">Tesla Annual Free Cash Flow<br><span>(Millions of US $)</span></th></tr></thead>
          </table>
          <table class="historical_data_table">
            <thead><tr><th colspan="2" style="text-align:center">Tesla Annual Free Cash Flow</th></tr></thead>
            <tbody>
              <tr><td>2024</td><td>$3,584</td></tr>
              <tr><td>2023</td><td>$4,358</td></tr>
              <tr><td>2022</td><td>$7,552.9</td></tr>
              <tr><td>2021</td><td>$-1,219</td></tr>
            </tbody>
          </table>
          <table>
            <thead><tr><th>Tesla Quarterly Free Cash Flow</th></tr></thead>
            <tbody><tr><td>2024-12-31</td><td>$2,034</td></tr></tbody>
          </table>
        </body></html>
    "#;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("tesla"), "Tesla");
        assert_eq!(title_case("TESLA"), "Tesla");
        assert_eq!(title_case("meta-platforms"), "Meta-Platforms");
        assert_eq!(title_case("alphabet inc"), "Alphabet Inc");
        assert_eq!(title_case("3m"), "3M");
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("$4,358").unwrap(), 4358);
        assert_eq!(parse_cell("$7,552.9").unwrap(), 7552);
        assert_eq!(parse_cell("$-1,219").unwrap(), -1219);
        assert!(matches!(parse_cell("n/a"), Err(ScrapeError::InvalidValue(_))));
    }

    #[test]
    fn test_parse_annual_table() {
        let values = parse_annual_fcf(PAGE, "tesla").unwrap();
        assert_eq!(values, vec![3584, 4358, 7552, -1219]);
    }

    #[test]
    fn test_header_must_match_exactly() {
        assert!(matches!(
            parse_annual_fcf(PAGE, "apple"),
            Err(ScrapeError::HeaderNotFound(h)) if h == "Apple Annual Free Cash Flow"
        ));
    }

    #[test]
    fn test_missing_tbody() {
        let page = r"<table><thead><tr><th>Tesla Annual Free Cash Flow</th></tr></thead></table>";
        assert!(matches!(
            parse_annual_fcf(page, "tesla"),
            Err(ScrapeError::TableNotFound)
        ));
    }
}
