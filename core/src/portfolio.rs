//! Portfolio aggregator: population averages for benchmarking.
//!
//! Each record's ratios are computed on their own, with their own zero
//! guards, and only then averaged. Nothing is cached: every call scans
//! the full record set it is given.

use crate::{
    applicant::ApplicantRecord,
    error::AnalysisError,
    ratios::{self, Breakeven, LiquidityRatios, ProfitabilityRatios},
};
use serde::{Deserialize, Serialize};

/// Every ratio the engine derives for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRatios {
    pub liquidity: LiquidityRatios,
    pub profitability: ProfitabilityRatios,
    pub breakeven: Result<Breakeven, AnalysisError>,
}

impl RecordRatios {
    pub fn compute(record: &ApplicantRecord) -> Self {
        let f = record.financials();
        Self {
            liquidity: ratios::liquidity_ratios(
                f.current_assets,
                f.fixed_assets,
                f.liabilities,
                f.equity,
            ),
            profitability: ratios::profitability_ratios(
                f.annual_sales,
                f.cost_of_sales,
                f.admin_costs,
                f.financial_costs,
                f.equity,
                f.current_assets,
                f.fixed_assets,
            ),
            breakeven: ratios::breakeven_analysis(
                f.annual_sales,
                Some(f.cost_of_sales),
                f.admin_costs,
                f.financial_costs,
            ),
        }
    }

    pub fn safety_margin_pct(&self) -> Option<f64> {
        self.breakeven.as_ref().ok().map(|b| b.safety_margin_pct)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioAverages {
    pub record_count: usize,
    pub avg_current_ratio: f64,
    pub avg_equity_ratio: f64,
    pub avg_times_interest_earned: f64,
    pub avg_operating_margin_pct: f64,
    pub avg_equity_ratio_pct: f64,
    /// Over records with a feasible break-even only.
    pub avg_breakeven_sales: Option<f64>,
    pub avg_safety_margin_pct: Option<f64>,
    /// Over records that carry loan terms only.
    pub avg_loan_amount: Option<f64>,
    /// How many records contributed to the break-even averages.
    pub breakeven_sample: usize,
}

impl PortfolioAverages {
    /// `None` for an empty portfolio.
    pub fn compute(records: &[ApplicantRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let per_record: Vec<RecordRatios> = records.iter().map(RecordRatios::compute).collect();

        let feasible: Vec<&Breakeven> = per_record
            .iter()
            .filter_map(|r| r.breakeven.as_ref().ok())
            .collect();
        let loan_amounts: Vec<f64> = records
            .iter()
            .filter_map(|r| r.applicant.loan.map(|l| l.amount))
            .collect();

        let averages = Self {
            record_count: records.len(),
            avg_current_ratio: mean_of(&per_record, |r| r.liquidity.current_ratio)?,
            avg_equity_ratio: mean_of(&per_record, |r| r.liquidity.equity_ratio)?,
            avg_times_interest_earned: mean_of(&per_record, |r| {
                r.profitability.times_interest_earned
            })?,
            avg_operating_margin_pct: mean_of(&per_record, |r| r.profitability.operating_margin_pct)?,
            avg_equity_ratio_pct: mean_of(&per_record, |r| r.profitability.equity_ratio_pct)?,
            avg_breakeven_sales: mean_of(&feasible, |b| b.breakeven_sales),
            avg_safety_margin_pct: mean_of(&feasible, |b| b.safety_margin_pct),
            avg_loan_amount: mean_of(&loan_amounts, |a| *a),
            breakeven_sample: feasible.len(),
        };
        log::debug!(
            "portfolio: {} records, {} with feasible break-even",
            averages.record_count,
            averages.breakeven_sample
        );
        Some(averages)
    }
}

/// Arithmetic mean of `value` over `items`; `None` when empty.
pub fn mean_of<T>(items: &[T], value: impl Fn(&T) -> f64) -> Option<f64> {
    if items.is_empty() {
        return None;
    }
    Some(items.iter().map(value).sum::<f64>() / items.len() as f64)
}

/// A record's value next to the population average.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    pub value: f64,
    pub average: Option<f64>,
}

impl Comparison {
    /// Signed gap to the average, if there is one.
    pub fn difference(&self) -> Option<f64> {
        self.average.map(|avg| self.value - avg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Benchmark {
    pub current_ratio: Comparison,
    pub equity_ratio: Comparison,
    pub times_interest_earned: Comparison,
    pub operating_margin_pct: Comparison,
    pub equity_ratio_pct: Comparison,
    pub safety_margin_pct: Option<Comparison>,
}

impl Benchmark {
    pub fn new(ratios: &RecordRatios, averages: &PortfolioAverages) -> Self {
        let cmp = |value: f64, average: f64| Comparison {
            value,
            average: Some(average),
        };
        Self {
            current_ratio: cmp(ratios.liquidity.current_ratio, averages.avg_current_ratio),
            equity_ratio: cmp(ratios.liquidity.equity_ratio, averages.avg_equity_ratio),
            times_interest_earned: cmp(
                ratios.profitability.times_interest_earned,
                averages.avg_times_interest_earned,
            ),
            operating_margin_pct: cmp(
                ratios.profitability.operating_margin_pct,
                averages.avg_operating_margin_pct,
            ),
            equity_ratio_pct: cmp(
                ratios.profitability.equity_ratio_pct,
                averages.avg_equity_ratio_pct,
            ),
            safety_margin_pct: ratios.safety_margin_pct().map(|value| Comparison {
                value,
                average: averages.avg_safety_margin_pct,
            }),
        }
    }
}
