//! TSLA Discounted Cash Flow Walkthrough
//!
//! Runs the full pipeline for Tesla against live data: CAPM for the cost of
//! equity, WACC as the discount rate, the three-year average FCF as the base,
//! then a ten-year DCF with 15% growth and 2.5% perpetual growth.
//!
//! ## Prerequisites
//!
//! Set your FMP API key in the environment or `.env` file:
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```
//!
//! ## Running
//!
//! ```bash
//! cargo run -p intrinsic-demos --example tsla_dcf
//! ```

use std::sync::Arc;

use intrinsic::fmp::{FmpClient, FmpError};
use intrinsic::macrotrends::MacrotrendsClient;
use intrinsic::{Ticker, Valuator};

const TICKER: &str = "TSLA";
const COMPANY: &str = "tesla";
const GROWTH_RATE: f64 = 0.15;
const PERPETUAL_GROWTH_RATE: f64 = 0.025;
const YEARS: u32 = 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = match FmpClient::from_env() {
        Ok(c) => c,
        Err(FmpError::MissingApiKey) => {
            eprintln!("Error: FMP_API_KEY not set.");
            eprintln!("\nTo run this example:");
            eprintln!("  1. Get a free API key at https://financialmodelingprep.com/");
            eprintln!("  2. Create a .env file with: FMP_API_KEY=your_key_here");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let valuator = Valuator::new(Arc::new(client), Arc::new(MacrotrendsClient::new()));
    let ticker = Ticker::new(TICKER)?;

    // =========================================================================
    // 1. Free cash flow growth from macrotrends
    // =========================================================================
    match valuator.cagr(&ticker, COMPANY, 5).await {
        Ok(cagr) => println!(
            "FCF CAGR (5y): {}  latest FCF: {}",
            cagr.formatted(),
            cagr.latest_fcf
        ),
        Err(e) => eprintln!("Warning: CAGR unavailable: {e}"),
    }

    // =========================================================================
    // 2. Full valuation
    // =========================================================================
    let report = valuator
        .valuation_report(&ticker, GROWTH_RATE, PERPETUAL_GROWTH_RATE, YEARS)
        .await?;

    println!("\n{TICKER}");
    println!("  Cost of equity (CAPM): {:.4}", report.capm.cost_of_equity);
    println!("  WACC:                  {:.3}", report.wacc.wacc);
    println!("  Base FCF:              {:.0}", report.base_fcf);
    println!("  Enterprise value:      {:.0}", report.dcf.enterprise_value);
    println!("  Intrinsic value/share: {:.2}", report.valuation.base_case);
    if let Some(discounted) = report.valuation.thirty_percent_margin_of_safety {
        println!("  With 30% margin:       {discounted:.2}");
    }

    let price = valuator.price(&ticker).await?;
    println!("  Current price:         {price:.2}");
    println!(
        "  Price / value:         {:.2}",
        price / report.valuation.base_case
    );

    Ok(())
}
