use chrono::{Duration, Utc};
use finance_query_core::{
    utils::{
        financials_constants::{BALANCE_SHEET_FIELDS, CASH_FLOW_FIELDS, INCOME_STATEMENT_FIELDS},
        get_statement_fields,
    },
    YahooError, YahooFinanceClient,
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{FinancialReport, FinancialStatement, Frequency, StatementType};

/// Default lookback for fundamentals queries (in years).
pub const FETCH_YEARS_DEFAULT: i64 = 5;

/// Canonical line items for a statement, in provider display order.
pub fn statement_fields(statement_type: StatementType) -> &'static [&'static str] {
    match statement_type {
        StatementType::IncomeStatement => INCOME_STATEMENT_FIELDS,
        StatementType::BalanceSheet => BALANCE_SHEET_FIELDS,
        StatementType::CashFlow => CASH_FLOW_FIELDS,
    }
}

/// Fetch fundamentals timeseries data for a symbol using finance-query-core.
///
/// This builds the correct `type` list from StatementType/Frequency and queries
/// Yahoo Finance fundamentals-timeseries over a configurable lookback.
pub async fn fetch_fundamentals_timeseries(
    client: &YahooFinanceClient,
    symbol: &str,
    statement_type: StatementType,
    frequency: Frequency,
    years_back: i64,
) -> Result<Value, YahooError> {
    let now = Utc::now().timestamp();
    let start = now - Duration::days(365 * years_back).num_seconds();

    let fields = get_statement_fields(statement_type.as_str(), frequency.as_str());
    let refs: Vec<&str> = fields.iter().map(String::as_str).collect();

    client
        .get_fundamentals_timeseries(symbol, start, now, &refs)
        .await
}

/// Reshape the raw fundamentals timeseries payload into `FinancialStatement`s.
/// Groups metrics by statement type and frequency, and indexes each metric's
/// values by `asOfDate`.
pub fn reshape_timeseries_to_financial_statements(data: &Value) -> Vec<FinancialStatement> {
    let mut grouped: HashMap<(String, StatementType, Frequency), FinancialStatement> =
        HashMap::new();

    let empty = Vec::new();
    let results = data
        .get("timeseries")
        .and_then(|t| t.get("result"))
        .and_then(|r| r.as_array())
        .unwrap_or(&empty);

    for entry in results {
        let symbol = entry
            .get("meta")
            .and_then(|m| m.get("symbol"))
            .and_then(|s| s.as_array())
            .and_then(|a| a.first())
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let object = match entry.as_object() {
            Some(o) => o,
            None => continue,
        };

        for (field, value) in object {
            if field == "meta" || field == "timestamp" {
                continue;
            }

            let (frequency, base_field) = if let Some(rest) = field.strip_prefix("annual") {
                (Frequency::Annual, rest)
            } else if let Some(rest) = field.strip_prefix("quarterly") {
                (Frequency::Quarterly, rest)
            } else {
                continue;
            };

            let Some(statement_type) = classify_field(base_field) else {
                continue;
            };

            let fs = grouped
                .entry((symbol.clone(), statement_type, frequency))
                .or_insert_with(|| FinancialStatement {
                    symbol: symbol.clone(),
                    statement_type: statement_type.as_str().to_string(),
                    frequency: frequency.as_str().to_string(),
                    statement: BTreeMap::new(),
                });

            let metric_map = fs.statement.entry(base_field.to_string()).or_default();

            // Yahoo pads series with nulls for periods it has no figure for.
            for item in value.as_array().into_iter().flatten() {
                if let Some(date) = item.get("asOfDate").and_then(|d| d.as_str()) {
                    metric_map.insert(date.to_string(), item.clone());
                }
            }
        }
    }

    grouped.into_values().collect()
}

/// Build the report table for one statement out of a raw timeseries payload.
///
/// Columns are reporting dates, most recent first. Rows keep the provider's
/// canonical field order and only include fields that have at least one entry.
/// A payload without the statement yields an empty report.
pub fn statement_report(
    data: &Value,
    statement_type: StatementType,
    frequency: Frequency,
) -> FinancialReport {
    let statements = reshape_timeseries_to_financial_statements(data);
    let Some(stmt) = statements.iter().find(|s| {
        s.statement_type == statement_type.as_str() && s.frequency == frequency.as_str()
    }) else {
        return FinancialReport::default();
    };

    let rows: Vec<&str> = statement_fields(statement_type)
        .iter()
        .copied()
        .filter(|field| {
            stmt.statement
                .get(*field)
                .is_some_and(|series| !series.is_empty())
        })
        .collect();

    let dates: Vec<String> = stmt
        .statement
        .values()
        .flat_map(|series| series.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect();

    let cells = rows
        .iter()
        .map(|field| {
            let series = &stmt.statement[*field];
            dates
                .iter()
                .map(|date| series.get(date).and_then(reported_value))
                .collect()
        })
        .collect();

    FinancialReport::new(rows.into_iter().map(String::from).collect(), dates, cells)
}

fn classify_field(base_field: &str) -> Option<StatementType> {
    [
        StatementType::IncomeStatement,
        StatementType::BalanceSheet,
        StatementType::CashFlow,
    ]
    .into_iter()
    .find(|st| statement_fields(*st).iter().any(|f| *f == base_field))
}

fn reported_value(item: &Value) -> Option<f64> {
    item.get("reportedValue")
        .and_then(|rv| rv.get("raw"))
        .and_then(|r| r.as_f64())
        .or_else(|| item.get("raw").and_then(|r| r.as_f64()))
}
