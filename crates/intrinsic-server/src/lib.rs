#![doc(issue_tracker_base_url = "https://github.com/factordynamics/intrinsic/issues/")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! HTTP API for the Intrinsic valuation service.
//!
//! A thin axum layer over [`intrinsic_engine::Valuator`]: each route parses
//! the ticker and parameters, runs one valuation operation and serializes the
//! result as JSON. Errors become `{"detail": ...}` bodies with an
//! endpoint-dependent status (see [`error`]).

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, Method},
};
use thiserror::Error;
use tower_http::{
    cors::{AllowHeaders, CorsLayer},
    trace::TraceLayer,
};

pub use config::ServiceConfig;
pub use error::{ApiError, LookupStatus};
pub use logging::init_logging;
pub use routes::build_router;
pub use state::AppState;

/// Errors raised while configuring or running the service.
#[derive(Debug, Error)]
pub enum ServerError {
    /// An environment variable holds an unusable value.
    #[error("invalid value {value:?} for {key}")]
    Config {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },

    /// The live providers need an FMP API key.
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    /// The CORS origin is not a valid header value.
    #[error("invalid CORS origin: {0}")]
    InvalidOrigin(String),

    /// FMP client setup failed.
    #[error(transparent)]
    Fmp(#[from] intrinsic_fmp::FmpError),

    /// Scraper setup failed.
    #[error(transparent)]
    Scrape(#[from] intrinsic_macrotrends::ScrapeError),

    /// Binding or serving failed.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for service setup.
pub type Result<T> = std::result::Result<T, ServerError>;

/// CORS policy allowing a single origin with credentials.
///
/// Methods and headers mirror the preflight request, which is how a wildcard
/// is expressed when credentials are allowed.
///
/// # Errors
///
/// Returns [`ServerError::InvalidOrigin`] if `origin` is not a valid header value.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|_| ServerError::InvalidOrigin(origin.to_string()))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// The router with CORS and request tracing applied.
///
/// # Errors
///
/// Returns an error if the CORS origin is invalid.
pub fn app(state: AppState, config: &ServiceConfig) -> Result<Router> {
    Ok(build_router(state)
        .layer(cors_layer(&config.cors_origin)?)
        .layer(TraceLayer::new_for_http()))
}

/// Bind and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, config: &ServiceConfig) -> Result<()> {
    let router = app(state, config)?;
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        address = %address,
        cors_origin = %config.cors_origin,
        "Intrinsic v{} listening",
        env!("CARGO_PKG_VERSION")
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
