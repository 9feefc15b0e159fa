//! The `report` subcommand: the full valuation pipeline for one ticker.

use anyhow::Result;
use intrinsic_engine::{ValuationReport, Valuator};
use intrinsic_traits::Ticker;

use super::valuation::banner;

pub(crate) async fn run(
    valuator: &Valuator,
    ticker: &str,
    growth_rate: f64,
    perpetual_growth_rate: f64,
    years: u32,
    json: bool,
) -> Result<()> {
    let ticker = Ticker::new(ticker)?;
    println!("Valuing {ticker}...");
    let report = valuator
        .valuation_report(&ticker, growth_rate, perpetual_growth_rate, years)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ValuationReport) {
    banner(&format!("{} valuation", report.ticker));

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("COST OF CAPITAL");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    println!("  Risk-free rate:        {:.4}", report.capm.risk_free_rate);
    println!("  Beta:                  {:.4}", report.capm.beta);
    println!("  Cost of equity:        {:.4}", report.capm.cost_of_equity);
    println!("  Cost of debt:          {:.4}", report.wacc.cost_of_debt);
    println!("  Tax rate:              {:.4}", report.wacc.corporate_tax_rate);
    println!("  WACC:                  {:.3}", report.wacc.wacc);
    println!();

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("DISCOUNTED CASH FLOW");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    println!("  Base FCF:              {:.0}", report.base_fcf);
    println!("  Growth rate:           {:.4}", report.parameters.growth_rate);
    println!("  Perpetual growth:      {:.4}", report.parameters.perpetual_growth_rate);
    println!("  Years:                 {}", report.parameters.years);
    println!("  PV of projected FCF:   {:.0}", report.dcf.pv_projected_fcf);
    println!("  Terminal value:        {:.0}", report.dcf.terminal_value);
    println!("  PV of terminal value:  {:.0}", report.dcf.pv_terminal_value);
    println!("  Enterprise value:      {:.0}", report.dcf.enterprise_value);
    println!("  Equity value:          {:.0}", report.dcf.equity_value);
    println!();

    println!("  Intrinsic value/share: {:.2}", report.valuation.base_case);
    if let Some(discounted) = report.valuation.thirty_percent_margin_of_safety {
        println!("  With 30% margin:       {discounted:.2}");
    }
    println!();
}
