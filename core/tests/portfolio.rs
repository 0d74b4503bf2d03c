//! Portfolio aggregator tests.

use pyme_core::applicant::{ApplicantRecord, Financials, LoanTerms, NewApplicant};
use pyme_core::portfolio::{Benchmark, PortfolioAverages, RecordRatios};
use pyme_core::types::{FundUse, Sector};

const EPS: f64 = 1e-9;

fn record(id: i64, financials: Financials) -> ApplicantRecord {
    ApplicantRecord {
        id,
        applicant: NewApplicant::new(format!("PyME {id}"), Sector::Retail, FundUse::WorkingCapital)
            .with_financials(financials),
    }
}

fn balance(current_assets: f64, liabilities: f64) -> Financials {
    Financials {
        annual_sales: 1000.0,
        cost_of_sales: 600.0,
        admin_costs: 100.0,
        financial_costs: 50.0,
        current_assets,
        fixed_assets: 300.0,
        liabilities,
        equity: 200.0,
    }
}

#[test]
fn empty_portfolio_has_no_averages() {
    assert!(PortfolioAverages::compute(&[]).is_none());
}

#[test]
fn current_ratio_average_of_two_records() {
    let records = [record(1, balance(500.0, 400.0)), record(2, balance(300.0, 400.0))];
    let avg = PortfolioAverages::compute(&records).unwrap();
    assert_eq!(avg.record_count, 2);
    assert!(
        (avg.avg_current_ratio - 1.0).abs() < EPS,
        "expected 1.0, got {}",
        avg.avg_current_ratio
    );
}

/// Guards apply per record before averaging.
#[test]
fn guards_apply_before_averaging() {
    let zero_liabilities = record(1, balance(50.0, 0.0));
    let normal = record(2, balance(300.0, 100.0));
    let avg = PortfolioAverages::compute(&[zero_liabilities, normal]).unwrap();
    // (50 / 1 + 300 / 100) / 2
    assert!((avg.avg_current_ratio - 26.5).abs() < EPS);
    assert!(avg.avg_current_ratio.is_finite());
}

/// Break-even averages skip records whose break-even cannot be computed.
#[test]
fn breakeven_average_excludes_unavailable_records() {
    let feasible = record(1, balance(500.0, 400.0));
    let mut no_sales = balance(500.0, 400.0);
    no_sales.annual_sales = 0.0;
    let mut infeasible = balance(500.0, 400.0);
    infeasible.cost_of_sales = 1200.0;

    let records = [feasible, record(2, no_sales), record(3, infeasible)];
    let avg = PortfolioAverages::compute(&records).unwrap();

    assert_eq!(avg.record_count, 3);
    assert_eq!(avg.breakeven_sample, 1);
    assert!((avg.avg_safety_margin_pct.unwrap() - 62.5).abs() < EPS);
    assert!((avg.avg_breakeven_sales.unwrap() - 375.0).abs() < EPS);
}

#[test]
fn breakeven_average_absent_when_no_record_qualifies() {
    let mut no_sales = balance(500.0, 400.0);
    no_sales.annual_sales = 0.0;
    let avg = PortfolioAverages::compute(&[record(1, no_sales)]).unwrap();
    assert_eq!(avg.breakeven_sample, 0);
    assert!(avg.avg_safety_margin_pct.is_none());
}

#[test]
fn loan_amount_average_covers_only_records_with_terms() {
    let mut with_loan = record(1, balance(500.0, 400.0));
    with_loan.applicant.loan = Some(LoanTerms {
        amount: 8_000.0,
        term_months: 12,
        annual_rate_pct: 18.0,
        employee_count: 3,
    });
    let without = record(2, balance(500.0, 400.0));

    let avg = PortfolioAverages::compute(&[with_loan, without]).unwrap();
    assert_eq!(avg.avg_loan_amount, Some(8_000.0));

    let avg = PortfolioAverages::compute(&[record(3, balance(1.0, 1.0))]).unwrap();
    assert!(avg.avg_loan_amount.is_none());
}

#[test]
fn benchmark_pairs_record_with_average() {
    let a = record(1, balance(500.0, 400.0));
    let b = record(2, balance(300.0, 400.0));
    let avg = PortfolioAverages::compute(&[a.clone(), b]).unwrap();

    let bench = Benchmark::new(&RecordRatios::compute(&a), &avg);
    assert!((bench.current_ratio.value - 1.25).abs() < EPS);
    assert!((bench.current_ratio.difference().unwrap() - 0.25).abs() < EPS);
    assert!(bench.safety_margin_pct.is_some());
}
