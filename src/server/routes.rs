use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CACHE_CONTROL, CONNECTION,
        CONTENT_TYPE,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::models::{Period, StatementType, StockPrice, ThreadCreated, ThreadState, DEFAULT_LIMIT};
use crate::server::{cors, ApiError, AppState, CorsPolicy, ErrorBody};
use crate::service::{gateway, stream};

pub const PREFLIGHT_MESSAGE: &str = "Preflight request successful";
pub const EXAMPLE_THREAD_ID: &str = "example-thread-id";

/// Build the main API router with the CORS policy applied to every route.
pub fn router(state: AppState, cors_policy: CorsPolicy) -> Router {
    Router::new()
        .route("/income-statement", get(income_statement).options(preflight))
        .route("/balance-sheet", get(balance_sheet).options(preflight))
        .route("/cash-flow", get(cash_flow).options(preflight))
        .route("/stock-price", get(stock_price).options(preflight))
        .route("/threads", post(create_thread).options(thread_preflight))
        .route("/api/threads", post(create_thread).options(thread_preflight))
        .route(
            "/threads/{thread_id}/runs/stream",
            post(stream_runs).options(stream_preflight),
        )
        .route(
            "/threads/{thread_id}/state",
            get(thread_state).options(preflight),
        )
        .route(
            "/api/threads/{thread_id}/state",
            get(thread_state).options(preflight),
        )
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            Arc::new(cors_policy),
            cors::apply_cors,
        ))
}

#[derive(Debug, Serialize)]
pub struct PreflightAck {
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatementQuery {
    pub ticker: Option<String>,
    pub period: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PriceQuery {
    pub ticker: Option<String>,
}

/// Gateway results are always 200: failures travel as `{"error": ...}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Embedded<T> {
    Data(T),
    Error(ErrorBody),
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Embedded<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Embedded::Data(data),
            Err(err) => Embedded::Error(ErrorBody::new(err.to_string())),
        }
    }
}

fn parse_limit(raw: Option<&str>) -> Result<i64, ApiError> {
    match raw {
        None => Ok(DEFAULT_LIMIT),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ApiError::InvalidLimit(raw.to_string())),
    }
}

async fn statement(
    state: &AppState,
    statement_type: StatementType,
    query: StatementQuery,
) -> Result<Json<Embedded<Value>>, ApiError> {
    let limit = parse_limit(query.limit.as_deref())?;
    let period = Period::from_query(query.period.as_deref());

    let result = gateway::get_statement(
        state.provider.as_ref(),
        statement_type,
        query.ticker.as_deref(),
        period,
        limit,
    )
    .await;

    Ok(Json(result.into()))
}

async fn income_statement(
    State(state): State<AppState>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<Embedded<Value>>, ApiError> {
    statement(&state, StatementType::IncomeStatement, query).await
}

async fn balance_sheet(
    State(state): State<AppState>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<Embedded<Value>>, ApiError> {
    statement(&state, StatementType::BalanceSheet, query).await
}

async fn cash_flow(
    State(state): State<AppState>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<Embedded<Value>>, ApiError> {
    statement(&state, StatementType::CashFlow, query).await
}

async fn stock_price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Json<Embedded<StockPrice>> {
    let result = gateway::get_stock_price(state.provider.as_ref(), query.ticker.as_deref()).await;
    Json(result.into())
}

async fn preflight() -> Json<PreflightAck> {
    Json(PreflightAck {
        message: PREFLIGHT_MESSAGE,
    })
}

async fn thread_preflight() -> Response {
    (
        [
            (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
        ],
        preflight().await,
    )
        .into_response()
}

async fn stream_preflight(Path(thread_id): Path<String>) -> Response {
    info!(thread_id = %thread_id, "Received stream preflight");
    thread_preflight().await
}

async fn create_thread() -> Json<ThreadCreated> {
    info!(thread_id = EXAMPLE_THREAD_ID, "Created thread");
    Json(ThreadCreated {
        thread_id: EXAMPLE_THREAD_ID,
        status: "created",
    })
}

async fn stream_runs(State(state): State<AppState>, Path(thread_id): Path<String>) -> Response {
    info!(thread_id = %thread_id, "Received stream request");

    let body = Body::from_stream(stream::run_frames(thread_id, state.stream_event_delay));
    (
        [
            (CONTENT_TYPE, "text/event-stream"),
            (CACHE_CONTROL, "no-cache"),
            (CONNECTION, "keep-alive"),
        ],
        body,
    )
        .into_response()
}

async fn thread_state(Path(thread_id): Path<String>) -> Json<ThreadState> {
    Json(ThreadState {
        thread_id,
        state: Map::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_to_five() {
        assert_eq!(parse_limit(None).unwrap(), 5);
    }

    #[test]
    fn limit_accepts_signed_integers_with_whitespace() {
        assert_eq!(parse_limit(Some(" 3 ")).unwrap(), 3);
        assert_eq!(parse_limit(Some("-2")).unwrap(), -2);
        assert_eq!(parse_limit(Some("+4")).unwrap(), 4);
    }

    #[test]
    fn limit_rejects_non_integers() {
        let err = parse_limit(Some("five")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid limit 'five': expected an integer");
        assert!(parse_limit(Some("2.5")).is_err());
    }

    #[test]
    fn embedded_error_serializes_as_error_object() {
        let result: Result<Value, &str> = Err("boom");
        let body = serde_json::to_value(Embedded::from(result)).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "boom" }));
    }
}
