use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which financial statement to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    IncomeStatement,
    BalanceSheet,
    CashFlow,
}

impl StatementType {
    /// Statement key understood by finance-query-core and used when grouping timeseries.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::IncomeStatement => "income",
            StatementType::BalanceSheet => "balance",
            StatementType::CashFlow => "cashflow",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            StatementType::IncomeStatement => "income statement",
            StatementType::BalanceSheet => "balance sheet",
            StatementType::CashFlow => "cash flow statement",
        }
    }
}

/// Reporting frequency of the provider's timeseries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Annual,
    Quarterly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Annual => "annual",
            Frequency::Quarterly => "quarterly",
        }
    }
}

/// Windowing direction requested by a caller.
///
/// Only the exact string `annual` selects [`Period::Annual`]; every other value,
/// including typos, is treated as quarterly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Annual,
    Quarterly,
}

impl Period {
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            None | Some("annual") => Period::Annual,
            Some(_) => Period::Quarterly,
        }
    }
}

/// One statement's raw timeseries, metric -> asOfDate -> provider item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialStatement {
    pub symbol: String,
    pub statement_type: String,
    pub frequency: String,
    pub statement: BTreeMap<String, BTreeMap<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_annual_selects_annual_windowing() {
        assert_eq!(Period::from_query(None), Period::Annual);
        assert_eq!(Period::from_query(Some("annual")), Period::Annual);
        assert_eq!(Period::from_query(Some("quarterly")), Period::Quarterly);
        assert_eq!(Period::from_query(Some("Annual")), Period::Quarterly);
        assert_eq!(Period::from_query(Some("")), Period::Quarterly);
    }

    #[test]
    fn statement_labels_match_error_wording() {
        assert_eq!(StatementType::IncomeStatement.label(), "income statement");
        assert_eq!(StatementType::BalanceSheet.label(), "balance sheet");
        assert_eq!(StatementType::CashFlow.label(), "cash flow statement");
    }
}
