use serde::{Deserialize, Serialize};

/// Simple quote as returned by the provider's quote endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: String,
    pub name: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

/// Body of `/stock-price`. Absent provider fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPrice {
    pub ticker: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

/// Body of `/price_snapshot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub ticker: String,
    pub price: f64,
}
