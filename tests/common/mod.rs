#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use stacks_api::config::Settings;
use stacks_api::models::{FinancialReport, StatementType};
use stacks_api::server::{routes, snapshot, AppState, CorsPolicy};
use stacks_api::service::finance::{FinanceServiceError, MarketDataProvider};

pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const FAILING_TICKER: &str = "ZZZZ";

/// Provider returning canned data and counting every call.
#[derive(Default)]
pub struct FakeProvider {
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, symbol: &str) -> Result<(), FinanceServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if symbol == FAILING_TICKER {
            return Err(FinanceServiceError::NotFound(symbol.to_string()));
        }
        Ok(())
    }
}

pub fn sample_report(statement_type: StatementType) -> FinancialReport {
    let first_row = match statement_type {
        StatementType::IncomeStatement => "TotalRevenue",
        StatementType::BalanceSheet => "TotalAssets",
        StatementType::CashFlow => "FreeCashFlow",
    };
    FinancialReport::new(
        vec![first_row.into(), "NetIncome".into()],
        vec![
            "2024-09-30".into(),
            "2023-09-30".into(),
            "2022-09-30".into(),
            "2021-09-30".into(),
        ],
        vec![
            vec![Some(391.0), Some(383.3), Some(394.3), Some(365.8)],
            vec![Some(93.7), Some(97.0), None, Some(94.7)],
        ],
    )
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    async fn financial_statement(
        &self,
        symbol: &str,
        statement_type: StatementType,
    ) -> Result<FinancialReport, FinanceServiceError> {
        self.record(symbol)?;
        Ok(sample_report(statement_type))
    }

    async fn company_info(&self, symbol: &str) -> Result<Map<String, Value>, FinanceServiceError> {
        self.record(symbol)?;
        let info = json!({
            "longName": "Apple Inc.",
            "sector": "Technology",
            "currentPrice": 227.5,
            "currency": "USD"
        });
        Ok(info.as_object().cloned().unwrap_or_default())
    }

    async fn latest_price(&self, symbol: &str) -> Result<f64, FinanceServiceError> {
        self.record(symbol)?;
        Ok(190.5)
    }
}

pub fn state(provider: Arc<FakeProvider>, delay: Duration) -> AppState {
    let settings = Settings {
        stream_event_delay: delay,
        ..Settings::default()
    };
    AppState::new(provider, &settings)
}

pub fn api_app(provider: Arc<FakeProvider>) -> Router {
    api_app_with_delay(provider, Duration::ZERO)
}

pub fn api_app_with_delay(provider: Arc<FakeProvider>, delay: Duration) -> Router {
    let cors = CorsPolicy::new(ALLOWED_ORIGIN, Duration::from_secs(3600)).unwrap();
    routes::router(state(provider, delay), cors)
}

pub fn snapshot_app(provider: Arc<FakeProvider>) -> Router {
    snapshot::router(state(provider, Duration::ZERO))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn options(app: Router, uri: &str) -> TestResponse {
    send(
        app,
        Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}
