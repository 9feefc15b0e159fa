//! Offline Valuation
//!
//! Values a made-up company from in-memory statements, no API key needed.
//! Prints the full report as JSON.
//!
//! ## Running
//!
//! ```bash
//! cargo run -p intrinsic-demos --example offline_valuation
//! ```

use std::sync::Arc;

use intrinsic::traits::{FixtureCompany, FixtureProvider, StatementKind};
use intrinsic::{LineItem, PricePoint, StatementTable, Ticker, Valuator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ticker = Ticker::new("ACME")?;

    let company = FixtureCompany {
        prices: vec![
            PricePoint::new("2024-12-30", 151.2),
            PricePoint::new("2024-12-31", 152.8),
        ],
        balance_sheet: StatementTable::new(StatementKind::BalanceSheet).with_period(
            "2024-12-31",
            [
                (LineItem::TotalDebt, Some(20_000.0)),
                (LineItem::CashAndCashEquivalents, Some(15_000.0)),
            ],
        ),
        income_statement: StatementTable::new(StatementKind::IncomeStatement).with_period(
            "2024-12-31",
            [
                (LineItem::InterestExpense, Some(1_000.0)),
                (LineItem::TaxProvision, Some(2_100.0)),
                (LineItem::PretaxIncome, Some(10_000.0)),
                (LineItem::DilutedEps, Some(6.4)),
            ],
        ),
        cash_flow: StatementTable::new(StatementKind::CashFlow)
            .with_period("2024-12-31", [(LineItem::FreeCashFlow, Some(9_000.0))])
            .with_period("2023-12-31", [(LineItem::FreeCashFlow, Some(8_000.0))])
            .with_period("2022-12-31", [(LineItem::FreeCashFlow, Some(7_000.0))]),
        market_cap: Some(180_000.0),
        shares_outstanding: Some(1_200.0),
        beta: Some(1.1),
        fcf_history: vec![9_000, 8_000, 7_000, 6_500, 6_000, 5_200],
    };

    let provider = Arc::new(
        FixtureProvider::new()
            .with_company(ticker.clone(), company)
            .with_treasury_yield(4.2),
    );
    let valuator = Valuator::new(provider.clone(), provider);

    let cagr = valuator.cagr(&ticker, "acme", 5).await?;
    println!("FCF CAGR: {}", cagr.formatted());

    let report = valuator.valuation_report(&ticker, 0.08, 0.025, 10).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
