use finance_query_core::YahooFinanceClient;
use serde_json::{Map, Value};

use crate::service::finance::FinanceServiceError;

/// quoteSummary modules merged into a company info object, later modules win.
pub const INFO_MODULES: &[&str] = &[
    "assetProfile",
    "summaryProfile",
    "summaryDetail",
    "quoteType",
    "price",
    "defaultKeyStatistics",
    "financialData",
];

/// Fetch the company profile and key statistics for a symbol as one flat object.
pub async fn fetch_company_info(
    client: &YahooFinanceClient,
    symbol: &str,
) -> Result<Map<String, Value>, FinanceServiceError> {
    let summary = client.get_quote_summary(symbol, INFO_MODULES).await?;
    let info = flatten_quote_summary(&summary)
        .ok_or_else(|| FinanceServiceError::NotFound(symbol.to_string()))?;

    if info.is_empty() {
        return Err(FinanceServiceError::NotFound(symbol.to_string()));
    }
    Ok(info)
}

/// Merge the modules of a quoteSummary response into a single map.
///
/// Returns `None` when the response carries no result.
pub fn flatten_quote_summary(summary: &Value) -> Option<Map<String, Value>> {
    let result = summary
        .get("quoteSummary")
        .and_then(|q| q.get("result"))
        .and_then(|r| r.as_array())
        .and_then(|arr| arr.first())?;

    let mut info = Map::new();
    for module in INFO_MODULES {
        let Some(fields) = result.get(*module).and_then(|m| m.as_object()) else {
            continue;
        };
        for (key, value) in fields {
            if key == "maxAge" {
                continue;
            }
            if let Some(value) = unwrap_formatted(value) {
                info.insert(key.clone(), value);
            }
        }
    }
    Some(info)
}

/// Collapse Yahoo's `{raw, fmt, longFmt}` wrappers. Empty objects are dropped.
fn unwrap_formatted(value: &Value) -> Option<Value> {
    match value {
        Value::Object(obj) if obj.is_empty() => None,
        Value::Object(obj) if obj.contains_key("raw") => obj.get("raw").cloned(),
        Value::Object(obj) if obj.contains_key("fmt") => obj.get("fmt").cloned(),
        other => Some(other.clone()),
    }
}
