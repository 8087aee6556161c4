use std::sync::Arc;

use async_trait::async_trait;
use finance_query_core::{FetchClient, YahooAuthManager, YahooError, YahooFinanceClient};
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{FinancialReport, Frequency, PriceQuote, StatementType};

pub mod fundamentals;
pub mod info;

#[derive(Debug, thiserror::Error)]
pub enum FinanceServiceError {
    #[error(transparent)]
    Yahoo(#[from] YahooError),
    #[error("No quote data for symbol {0}")]
    NotFound(String),
    #[error("ticker symbol is required")]
    MissingTicker,
}

/// Market data the HTTP layer needs from a provider.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Full annual statement, most recent period first.
    async fn financial_statement(
        &self,
        symbol: &str,
        statement_type: StatementType,
    ) -> Result<FinancialReport, FinanceServiceError>;

    /// Flattened company profile and key statistics.
    async fn company_info(&self, symbol: &str) -> Result<Map<String, Value>, FinanceServiceError>;

    /// Latest regular-market price.
    async fn latest_price(&self, symbol: &str) -> Result<f64, FinanceServiceError>;
}

pub struct FinanceService {
    client: Arc<YahooFinanceClient>,
}

impl FinanceService {
    /// Build a finance service with optional proxy support.
    pub fn new(proxy: Option<String>) -> Result<Self, FinanceServiceError> {
        let fetch = Arc::new(FetchClient::new(proxy.clone())?);
        let auth = Arc::new(YahooAuthManager::new(proxy, fetch.cookie_jar().clone()));
        let client = Arc::new(YahooFinanceClient::new(auth, fetch));

        Ok(Self { client })
    }

    /// Fetch a simple price quote for a single symbol.
    pub async fn get_price(&self, symbol: &str) -> Result<PriceQuote, FinanceServiceError> {
        let data = self.client.get_simple_quotes(&[symbol]).await?;
        extract_simple_quote(&data).ok_or_else(|| FinanceServiceError::NotFound(symbol.to_string()))
    }

    /// Fetch raw fundamentals timeseries for a symbol and frequency.
    pub async fn get_fundamentals_raw(
        &self,
        symbol: &str,
        statement_type: StatementType,
        frequency: Frequency,
        years_back: i64,
    ) -> Result<Value, FinanceServiceError> {
        let data = fundamentals::fetch_fundamentals_timeseries(
            self.client.as_ref(),
            symbol,
            statement_type,
            frequency,
            years_back,
        )
        .await?;

        Ok(data)
    }
}

#[async_trait]
impl MarketDataProvider for FinanceService {
    async fn financial_statement(
        &self,
        symbol: &str,
        statement_type: StatementType,
    ) -> Result<FinancialReport, FinanceServiceError> {
        let raw = self
            .get_fundamentals_raw(
                symbol,
                statement_type,
                Frequency::Annual,
                fundamentals::FETCH_YEARS_DEFAULT,
            )
            .await?;
        let report = fundamentals::statement_report(&raw, statement_type, Frequency::Annual);
        debug!(
            symbol,
            statement = statement_type.as_str(),
            rows = report.rows().len(),
            columns = report.columns().len(),
            "Reshaped fundamentals timeseries"
        );
        Ok(report)
    }

    async fn company_info(&self, symbol: &str) -> Result<Map<String, Value>, FinanceServiceError> {
        info::fetch_company_info(self.client.as_ref(), symbol).await
    }

    async fn latest_price(&self, symbol: &str) -> Result<f64, FinanceServiceError> {
        self.get_price(symbol)
            .await?
            .price
            .ok_or_else(|| FinanceServiceError::NotFound(symbol.to_string()))
    }
}

/// Extract the first simple quote from the Yahoo response.
fn extract_simple_quote(data: &Value) -> Option<PriceQuote> {
    let result = data
        .get("quoteResponse")
        .and_then(|q| q.get("result"))
        .and_then(|r| r.as_array())
        .and_then(|arr| arr.first())?;

    Some(PriceQuote {
        symbol: result.get("symbol")?.as_str()?.to_string(),
        name: result
            .get("longName")
            .or_else(|| result.get("shortName"))
            .and_then(|n| n.as_str())
            .unwrap_or_default()
            .to_string(),
        price: result.get("regularMarketPrice").and_then(|v| v.as_f64()),
        currency: result
            .get("currency")
            .or_else(|| result.get("financialCurrency"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string()),
    })
}

pub use FinanceServiceError as Error;
