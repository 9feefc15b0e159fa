//! Intrinsic CLI binary.
//!
//! Runs the valuation HTTP service, or a single valuation step against the
//! live data providers.

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use intrinsic_engine::DEFAULT_TIME_PERIOD;
use intrinsic_server::{ServiceConfig, init_logging};
use intrinsic_traits::DcfParameters;
use std::process;

#[derive(Parser)]
#[command(name = "intrinsic")]
#[command(about = "Equity valuation service: DCF, WACC, CAPM and FCF growth", long_about = None)]
#[command(version)]
struct Cli {
    /// Base log level (overrides INTRINSIC_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format: pretty or json (overrides INTRINSIC_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Bind host (overrides INTRINSIC_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides INTRINSIC_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Allowed CORS origin (overrides INTRINSIC_CORS_ORIGIN)
        #[arg(long)]
        cors_origin: Option<String>,
    },

    /// Current share price
    Price {
        /// Ticker symbol
        ticker: String,
    },

    /// Closing prices on specific dates
    History {
        /// Ticker symbol
        ticker: String,

        /// Dates (YYYY-MM-DD)
        #[arg(required = true, value_delimiter = ',')]
        dates: Vec<String>,
    },

    /// Reported free cash flows, most recent first
    Pastfcf {
        /// Ticker symbol
        ticker: String,
    },

    /// Compound annual growth of free cash flow
    Cagr {
        /// Ticker symbol
        ticker: String,

        /// Company name as used in macrotrends URLs (e.g. tesla)
        name: String,

        /// Number of compounding periods
        #[arg(short, long, default_value_t = DEFAULT_TIME_PERIOD)]
        time_period: usize,
    },

    /// Cost of equity via CAPM
    Capm {
        /// Ticker symbol
        ticker: String,
    },

    /// Weighted average cost of capital
    Wacc {
        /// Ticker symbol
        ticker: String,

        /// Cost of equity; computed via CAPM when omitted
        #[arg(long)]
        capm: Option<f64>,
    },

    /// Base free cash flow (average of the latest years)
    Basefcf {
        /// Ticker symbol
        ticker: String,
    },

    /// Latest diluted earnings per share
    Eps {
        /// Ticker symbol
        ticker: String,
    },

    /// Discounted cash flow value per share
    Dcf {
        /// Ticker symbol
        ticker: String,

        /// Starting free cash flow
        #[arg(long)]
        base_fcf: f64,

        /// Annual growth rate during the projection
        #[arg(long)]
        growth_rate: f64,

        /// Growth rate after the projection
        #[arg(long)]
        perpetual_growth_rate: f64,

        /// Discount rate
        #[arg(long)]
        discount_rate: f64,

        /// Projection years
        #[arg(long, default_value = "5")]
        years: u32,

        /// Also report the value with a 30% margin of safety
        #[arg(long)]
        margin_of_safety: bool,
    },

    /// Full pipeline: CAPM, WACC, base FCF and DCF
    Report {
        /// Ticker symbol
        ticker: String,

        /// Annual growth rate during the projection
        #[arg(long)]
        growth_rate: f64,

        /// Growth rate after the projection
        #[arg(long)]
        perpetual_growth_rate: f64,

        /// Projection years
        #[arg(long, default_value = "10")]
        years: u32,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ServiceConfig::from_env()?;
    let serving = matches!(cli.command, Commands::Serve { .. });

    // One-shot commands stay quiet unless asked.
    config.log_level = cli
        .log_level
        .unwrap_or_else(|| if serving { config.log_level.clone() } else { "warn".to_string() });
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    init_logging(&config.log_level, &config.log_format);

    let valuator = || cmd::valuation::valuator(&config);

    match cli.command {
        Commands::Serve {
            host,
            port,
            cors_origin,
        } => {
            let mut config = config.clone();
            cmd::serve::apply_overrides(&mut config, host, port, cors_origin);
            cmd::serve::run(&config).await?;
        }
        Commands::Price { ticker } => cmd::valuation::price(&valuator()?, &ticker).await?,
        Commands::History { ticker, dates } => {
            cmd::valuation::history(&valuator()?, &ticker, &dates).await?;
        }
        Commands::Pastfcf { ticker } => cmd::valuation::past_fcf(&valuator()?, &ticker).await?,
        Commands::Cagr {
            ticker,
            name,
            time_period,
        } => cmd::valuation::cagr(&valuator()?, &ticker, &name, time_period).await?,
        Commands::Capm { ticker } => cmd::valuation::capm(&valuator()?, &ticker).await?,
        Commands::Wacc { ticker, capm } => {
            cmd::valuation::wacc(&valuator()?, &ticker, capm).await?;
        }
        Commands::Basefcf { ticker } => cmd::valuation::base_fcf(&valuator()?, &ticker).await?,
        Commands::Eps { ticker } => cmd::valuation::eps(&valuator()?, &ticker).await?,
        Commands::Dcf {
            ticker,
            base_fcf,
            growth_rate,
            perpetual_growth_rate,
            discount_rate,
            years,
            margin_of_safety,
        } => {
            let params = DcfParameters {
                base_fcf,
                growth_rate,
                perpetual_growth_rate,
                discount_rate,
                years,
            };
            cmd::valuation::dcf(&valuator()?, &ticker, &params, margin_of_safety).await?;
        }
        Commands::Report {
            ticker,
            growth_rate,
            perpetual_growth_rate,
            years,
            json,
        } => {
            cmd::report::run(
                &valuator()?,
                &ticker,
                growth_rate,
                perpetual_growth_rate,
                years,
                json,
            )
            .await?;
        }
    }

    Ok(())
}
