//! [`FcfHistorySource`] implementation backed by macrotrends.

use async_trait::async_trait;
use intrinsic_traits::{FcfHistorySource, Result, Ticker};

use crate::MacrotrendsClient;

#[async_trait]
impl FcfHistorySource for MacrotrendsClient {
    fn name(&self) -> &'static str {
        "macrotrends"
    }

    async fn annual_free_cash_flow(&self, ticker: &Ticker, company: &str) -> Result<Vec<i64>> {
        Ok(Self::annual_free_cash_flow(self, ticker.as_str(), company).await?)
    }
}
