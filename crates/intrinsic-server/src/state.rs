//! Shared application state.

use std::sync::Arc;

use intrinsic_engine::Valuator;
use intrinsic_fmp::FmpClient;
use intrinsic_macrotrends::MacrotrendsClient;
use intrinsic_traits::{FcfHistorySource, MarketDataProvider};

use crate::{Result, ServerError, config::ServiceConfig};

/// State handed to every handler. Read-only and cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Valuation operations over the configured providers.
    pub valuator: Valuator,
}

impl AppState {
    /// State over arbitrary providers.
    pub fn new(market: Arc<dyn MarketDataProvider>, fcf_history: Arc<dyn FcfHistorySource>) -> Self {
        Self {
            valuator: Valuator::new(market, fcf_history),
        }
    }

    /// State over a preconfigured valuator.
    #[must_use]
    pub const fn from_valuator(valuator: Valuator) -> Self {
        Self { valuator }
    }

    /// State over the live FMP and macrotrends providers.
    ///
    /// # Errors
    ///
    /// Returns an error if no FMP API key is configured or an HTTP client
    /// cannot be built.
    pub fn live(config: &ServiceConfig) -> Result<Self> {
        let api_key = config.fmp_api_key.clone().ok_or(ServerError::MissingApiKey)?;
        let fmp = FmpClient::new(api_key).with_timeout(config.request_timeout)?;
        let macrotrends = MacrotrendsClient::new().with_timeout(config.request_timeout)?;
        Ok(Self::new(Arc::new(fmp), Arc::new(macrotrends)))
    }
}
