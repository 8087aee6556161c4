use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Period, StatementType, StockPrice};
use crate::service::finance::{FinanceServiceError, MarketDataProvider};

/// A failed gateway lookup. Displays as `Error fetching <subject>: <detail>`.
#[derive(Debug, Error)]
#[error("Error fetching {subject}: {source}")]
pub struct GatewayError {
    subject: &'static str,
    source: FinanceServiceError,
}

impl GatewayError {
    pub fn new(subject: &'static str, source: FinanceServiceError) -> Self {
        Self { subject, source }
    }

    pub fn subject(&self) -> &'static str {
        self.subject
    }
}

fn require_ticker(ticker: Option<&str>) -> Result<&str, FinanceServiceError> {
    ticker
        .filter(|t| !t.is_empty())
        .ok_or(FinanceServiceError::MissingTicker)
}

/// Fetch a statement and window it for the requested period.
pub async fn get_statement(
    provider: &dyn MarketDataProvider,
    statement_type: StatementType,
    ticker: Option<&str>,
    period: Period,
    limit: i64,
) -> Result<Value, GatewayError> {
    let wrap = |e| GatewayError::new(statement_type.label(), e);
    let ticker = require_ticker(ticker).map_err(wrap)?;

    info!(
        ticker,
        statement = statement_type.as_str(),
        ?period,
        limit,
        "Fetching financial statement"
    );

    let report = provider
        .financial_statement(ticker, statement_type)
        .await
        .map_err(|e| {
            warn!(ticker, statement = statement_type.as_str(), "Provider error: {e}");
            wrap(e)
        })?;

    Ok(report.window(period, limit).to_json())
}

pub async fn get_income_statement(
    provider: &dyn MarketDataProvider,
    ticker: Option<&str>,
    period: Period,
    limit: i64,
) -> Result<Value, GatewayError> {
    get_statement(provider, StatementType::IncomeStatement, ticker, period, limit).await
}

pub async fn get_balance_sheet(
    provider: &dyn MarketDataProvider,
    ticker: Option<&str>,
    period: Period,
    limit: i64,
) -> Result<Value, GatewayError> {
    get_statement(provider, StatementType::BalanceSheet, ticker, period, limit).await
}

pub async fn get_cash_flow(
    provider: &dyn MarketDataProvider,
    ticker: Option<&str>,
    period: Period,
    limit: i64,
) -> Result<Value, GatewayError> {
    get_statement(provider, StatementType::CashFlow, ticker, period, limit).await
}

/// Current price and currency from the company info. Absent fields stay `None`.
pub async fn get_stock_price(
    provider: &dyn MarketDataProvider,
    ticker: Option<&str>,
) -> Result<StockPrice, GatewayError> {
    let wrap = |e| GatewayError::new("stock price", e);
    let ticker = require_ticker(ticker).map_err(wrap)?;

    info!(ticker, "Fetching stock price");

    let info = provider.company_info(ticker).await.map_err(|e| {
        warn!(ticker, "Provider error: {e}");
        wrap(e)
    })?;

    Ok(StockPrice {
        ticker: ticker.to_string(),
        price: info.get("currentPrice").and_then(|v| v.as_f64()),
        currency: info
            .get("currency")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
    })
}
