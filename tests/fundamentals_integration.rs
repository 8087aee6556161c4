use stacks_api::models::{Frequency, Period, StatementType};
use stacks_api::service::finance::fundamentals::{
    reshape_timeseries_to_financial_statements, statement_report,
};
use stacks_api::service::finance::{FinanceService, MarketDataProvider};

/// Integration tests that hit the live Yahoo Finance API via finance-query-core.
///
/// These require outbound network access and are ignored by default to avoid
/// failures in offline or CI environments. Run manually with:
/// `cargo test -- --ignored live_`.
#[tokio::test]
#[ignore = "requires network access to Yahoo Finance"]
async fn live_fundamentals_reshape_into_a_report() -> Result<(), Box<dyn std::error::Error>> {
    let finance = FinanceService::new(None)?;

    let raw = finance
        .get_fundamentals_raw("AAPL", StatementType::IncomeStatement, Frequency::Annual, 2)
        .await?;

    let statements = reshape_timeseries_to_financial_statements(&raw);
    println!("reshaped {} statement groups", statements.len());

    let report = statement_report(&raw, StatementType::IncomeStatement, Frequency::Annual);
    println!(
        "income statement: {} rows x {} columns, columns {:?}",
        report.rows().len(),
        report.columns().len(),
        report.columns()
    );

    assert!(!report.is_empty(), "expected a non-empty income statement");
    assert!(report.rows().iter().any(|r| r == "TotalRevenue"));

    let mut sorted = report.columns().to_vec();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(report.columns(), sorted.as_slice());

    Ok(())
}

#[tokio::test]
#[ignore = "requires network access to Yahoo Finance"]
async fn live_provider_windows_and_prices() -> Result<(), Box<dyn std::error::Error>> {
    let finance = FinanceService::new(None)?;

    let report = finance
        .financial_statement("MSFT", StatementType::BalanceSheet)
        .await?;
    let windowed = report.window(Period::Annual, 2);
    assert!(windowed.columns().len() <= 2);
    assert_eq!(windowed.columns(), &report.columns()[..windowed.columns().len()]);

    let info = finance.company_info("MSFT").await?;
    println!(
        "MSFT currentPrice={:?} currency={:?}",
        info.get("currentPrice"),
        info.get("currency")
    );
    assert!(info.contains_key("currency"));

    let price = finance.latest_price("MSFT").await?;
    assert!(price > 0.0);

    Ok(())
}
