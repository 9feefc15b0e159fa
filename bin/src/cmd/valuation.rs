//! One-shot valuation subcommands.
//!
//! Each command runs a single [`Valuator`] operation against the live providers
//! and prints the result.

use anyhow::Result;
use intrinsic_engine::Valuator;
use intrinsic_server::{AppState, ServiceConfig};
use intrinsic_traits::{DcfParameters, Ticker};

/// Build a valuator over the live FMP and macrotrends providers.
pub(crate) fn valuator(config: &ServiceConfig) -> Result<Valuator> {
    Ok(AppState::live(config)?.valuator)
}

pub(crate) fn banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║ {title:^60} ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

pub(crate) async fn price(valuator: &Valuator, ticker: &str) -> Result<()> {
    let ticker = Ticker::new(ticker)?;
    let price = valuator.price(&ticker).await?;
    println!("{ticker}: {price:.2}");
    Ok(())
}

pub(crate) async fn history(valuator: &Valuator, ticker: &str, dates: &[String]) -> Result<()> {
    let ticker = Ticker::new(ticker)?;
    let points = valuator.historical_prices(&ticker, dates).await?;
    if points.is_empty() {
        anyhow::bail!("No price data found for {ticker}");
    }

    banner(&format!("{ticker} closing prices"));
    println!("{:<12} {:>12}", "Date", "Close");
    println!("{}", "─".repeat(25));
    for point in &points {
        println!("{:<12} {:>12.2}", point.date, point.price);
    }
    println!();
    Ok(())
}

pub(crate) async fn past_fcf(valuator: &Valuator, ticker: &str) -> Result<()> {
    let ticker = Ticker::new(ticker)?;
    let fcf = valuator.past_fcf(&ticker).await?;

    banner(&format!("{ticker} free cash flow"));
    for (age, value) in fcf.iter().enumerate() {
        println!("  t-{age:<3} {value:>20.0}");
    }
    println!();
    Ok(())
}

pub(crate) async fn cagr(
    valuator: &Valuator,
    ticker: &str,
    name: &str,
    time_period: usize,
) -> Result<()> {
    let ticker = Ticker::new(ticker)?;
    let result = valuator.cagr(&ticker, name, time_period).await?;
    println!("CAGR ({time_period} periods): {}", result.formatted());
    println!("Latest FCF:           {}", result.latest_fcf);
    Ok(())
}

pub(crate) async fn capm(valuator: &Valuator, ticker: &str) -> Result<()> {
    let ticker = Ticker::new(ticker)?;
    let estimate = valuator.capm_estimate(&ticker).await?;

    banner(&format!("{ticker} cost of equity"));
    println!("Risk-free rate:      {:.4}", estimate.risk_free_rate);
    println!("Beta:                {:.4}", estimate.beta);
    println!("Equity risk premium: {:.4}", estimate.equity_risk_premium);
    println!("Cost of equity:      {:.4}", estimate.cost_of_equity);
    println!();
    Ok(())
}

pub(crate) async fn wacc(valuator: &Valuator, ticker: &str, capm: Option<f64>) -> Result<()> {
    let ticker = Ticker::new(ticker)?;
    let cost_of_equity = match capm {
        Some(value) => value,
        None => valuator.capm(&ticker).await?,
    };
    let wacc = valuator.wacc_breakdown(&ticker, cost_of_equity).await?;

    banner(&format!("{ticker} WACC"));
    println!("Cost of equity:     {:.4}", wacc.cost_of_equity);
    println!("Cost of debt:       {:.4}", wacc.cost_of_debt);
    println!("Tax rate:           {:.4}", wacc.corporate_tax_rate);
    println!("Equity weight:      {:.4}", wacc.weight_equity);
    println!("Debt weight:        {:.4}", wacc.weight_debt);
    println!("WACC:               {:.3}", wacc.wacc);
    println!();
    Ok(())
}

pub(crate) async fn base_fcf(valuator: &Valuator, ticker: &str) -> Result<()> {
    let ticker = Ticker::new(ticker)?;
    let base = valuator.base_fcf(&ticker).await?;
    println!("{ticker} base FCF: {base:.0}");
    Ok(())
}

pub(crate) async fn eps(valuator: &Valuator, ticker: &str) -> Result<()> {
    let ticker = Ticker::new(ticker)?;
    let eps = valuator.eps(&ticker).await?;
    println!("{ticker} diluted EPS: {eps:.2}");
    Ok(())
}

pub(crate) async fn dcf(
    valuator: &Valuator,
    ticker: &str,
    params: &DcfParameters,
    margin_of_safety: bool,
) -> Result<()> {
    let ticker = Ticker::new(ticker)?;
    let valuation = valuator.dcf(&ticker, params, margin_of_safety).await?;

    println!("{ticker} intrinsic value per share: {:.2}", valuation.base_case);
    if let Some(discounted) = valuation.thirty_percent_margin_of_safety {
        println!("With 30% margin of safety:         {discounted:.2}");
    }
    Ok(())
}
