use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::models::{PriceSnapshot, StatementType};
use crate::server::{ApiError, AppState};

/// Build the snapshot router. Errors here use real HTTP statuses: 400 for a
/// missing ticker, 500 for provider failures.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/price_snapshot", get(price_snapshot))
        .route("/financials", get(financials))
        .route("/company_info", get(company_info))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct TickerQuery {
    pub ticker: Option<String>,
}

impl TickerQuery {
    fn require(&self) -> Result<&str, ApiError> {
        self.ticker
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingTicker)
    }
}

/// Full statements for `/financials`, each `{date -> {line item -> value}}`.
#[derive(Debug, Serialize)]
pub struct FinancialsResponse {
    pub income_statement: Value,
    pub balance_sheet: Value,
    pub cash_flow: Value,
}

async fn price_snapshot(
    State(state): State<AppState>,
    Query(query): Query<TickerQuery>,
) -> Result<Json<PriceSnapshot>, ApiError> {
    let ticker = query.require()?;
    info!(ticker, "Fetching price snapshot");

    let price = state.provider.latest_price(ticker).await?;

    Ok(Json(PriceSnapshot {
        ticker: ticker.to_string(),
        price,
    }))
}

async fn financials(
    State(state): State<AppState>,
    Query(query): Query<TickerQuery>,
) -> Result<Json<FinancialsResponse>, ApiError> {
    let ticker = query.require()?;
    info!(ticker, "Fetching financial statements");

    let provider = state.provider.as_ref();
    let (income, balance, cash) = tokio::try_join!(
        provider.financial_statement(ticker, StatementType::IncomeStatement),
        provider.financial_statement(ticker, StatementType::BalanceSheet),
        provider.financial_statement(ticker, StatementType::CashFlow),
    )?;

    Ok(Json(FinancialsResponse {
        income_statement: income.to_json(),
        balance_sheet: balance.to_json(),
        cash_flow: cash.to_json(),
    }))
}

async fn company_info(
    State(state): State<AppState>,
    Query(query): Query<TickerQuery>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let ticker = query.require()?;
    info!(ticker, "Fetching company info");

    Ok(Json(state.provider.company_info(ticker).await?))
}
