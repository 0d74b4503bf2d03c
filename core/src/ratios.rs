//! Ratio engine: pure solvency and profitability indicators.
//!
//! RULE: Liquidity and profitability ratios never fail. Every zero
//! denominator is replaced through `guarded_divide` with a substitute
//! of 1, so the result is an approximation rather than an error.
//!
//! Break-even is the exception. A substituted denominator would produce
//! a misleading sales target, so `breakeven_analysis` returns an
//! `AnalysisError` instead.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Denominator used whenever the real one is zero.
pub const GUARD_SUBSTITUTE: f64 = 1.0;

/// Divide, replacing a zero denominator with `substitute`.
pub fn guarded_divide(numerator: f64, denominator: f64, substitute: f64) -> f64 {
    let denominator = if denominator == 0.0 { substitute } else { denominator };
    numerator / denominator
}

fn guarded(numerator: f64, denominator: f64) -> f64 {
    guarded_divide(numerator, denominator, GUARD_SUBSTITUTE)
}

/// Sales minus cost of sales minus administrative costs.
pub fn operating_income(sales: f64, cost_of_sales: f64, admin_costs: f64) -> f64 {
    sales - cost_of_sales - admin_costs
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LiquidityRatios {
    pub current_ratio: f64,
    pub equity_ratio: f64,
}

/// Current ratio and equity ratio (as a fraction of total assets).
pub fn liquidity_ratios(
    current_assets: f64,
    fixed_assets: f64,
    liabilities: f64,
    equity: f64,
) -> LiquidityRatios {
    LiquidityRatios {
        current_ratio: guarded(current_assets, liabilities),
        equity_ratio: guarded(equity, current_assets + fixed_assets),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProfitabilityRatios {
    pub times_interest_earned: f64,
    pub operating_margin_pct: f64,
    pub equity_ratio_pct: f64,
}

pub fn profitability_ratios(
    sales: f64,
    cost_of_sales: f64,
    admin_costs: f64,
    financial_costs: f64,
    equity: f64,
    current_assets: f64,
    fixed_assets: f64,
) -> ProfitabilityRatios {
    let operating = operating_income(sales, cost_of_sales, admin_costs);
    ProfitabilityRatios {
        times_interest_earned: guarded(operating, financial_costs),
        operating_margin_pct: guarded(operating, sales) * 100.0,
        equity_ratio_pct: guarded(equity, current_assets + fixed_assets) * 100.0,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Breakeven {
    pub variable_ratio: f64,
    pub breakeven_sales: f64,
    pub safety_margin_pct: f64,
    /// Fixed costs: administrative plus financial.
    pub fixed_costs: f64,
}

/// Break-even sales and margin of safety under a fixed/variable split
/// where cost of sales is the only variable cost.
///
/// `cost_of_sales` is `None` when the figure was never captured.
pub fn breakeven_analysis(
    sales: f64,
    cost_of_sales: Option<f64>,
    admin_costs: f64,
    financial_costs: f64,
) -> Result<Breakeven, AnalysisError> {
    if sales == 0.0 {
        return Err(AnalysisError::Undefined {
            reason: "annual sales are zero".into(),
        });
    }
    let Some(cost_of_sales) = cost_of_sales else {
        return Err(AnalysisError::Undefined {
            reason: "cost of sales is missing".into(),
        });
    };

    let variable_ratio = cost_of_sales / sales;
    if variable_ratio >= 1.0 {
        return Err(AnalysisError::InfeasibleCostStructure { variable_ratio });
    }

    let fixed_costs = admin_costs + financial_costs;
    let breakeven_sales = fixed_costs / (1.0 - variable_ratio);
    let safety_margin_pct = (sales - breakeven_sales) / sales * 100.0;

    Ok(Breakeven {
        variable_ratio,
        breakeven_sales,
        safety_margin_pct,
        fixed_costs,
    })
}

impl Breakeven {
    /// Total cost at a given sales level.
    pub fn total_cost_at(&self, sales: f64) -> f64 {
        self.fixed_costs + self.variable_ratio * sales
    }

    /// Chart points spanning `[low_factor, high_factor)` times break-even sales.
    pub fn curve(&self, low_factor: f64, high_factor: f64, steps: usize) -> BreakevenCurve {
        BreakevenCurve::new(
            self.breakeven_sales * low_factor,
            self.breakeven_sales * high_factor,
            steps,
            self.fixed_costs,
            self.variable_ratio,
        )
    }
}

/// One point of the break-even chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurvePoint {
    pub sales: f64,
    pub total_cost: f64,
}

/// Lazy `(sales, total_cost)` sequence over a half-open sales range.
/// Finite, and a new curve with the same bounds replays the same points.
#[derive(Debug, Clone)]
pub struct BreakevenCurve {
    start: f64,
    step: f64,
    steps: usize,
    index: usize,
    fixed_costs: f64,
    variable_ratio: f64,
}

impl BreakevenCurve {
    pub fn new(start: f64, end: f64, steps: usize, fixed_costs: f64, variable_ratio: f64) -> Self {
        let step = if steps == 0 { 0.0 } else { (end - start) / steps as f64 };
        // A zero-width range yields nothing.
        let steps = if step > 0.0 { steps } else { 0 };
        Self {
            start,
            step,
            steps,
            index: 0,
            fixed_costs,
            variable_ratio,
        }
    }
}

impl Iterator for BreakevenCurve {
    type Item = CurvePoint;

    fn next(&mut self) -> Option<CurvePoint> {
        if self.index >= self.steps {
            return None;
        }
        let sales = self.start + self.step * self.index as f64;
        self.index += 1;
        Some(CurvePoint {
            sales,
            total_cost: self.fixed_costs + self.variable_ratio * sales,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BreakevenCurve {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_divide_substitutes_only_zero() {
        assert_eq!(guarded_divide(10.0, 0.0, 1.0), 10.0);
        assert_eq!(guarded_divide(10.0, 0.0, 2.0), 5.0);
        assert_eq!(guarded_divide(10.0, 4.0, 1.0), 2.5);
        assert_eq!(guarded_divide(0.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn negative_operating_income_is_not_guarded() {
        let p = profitability_ratios(100.0, 80.0, 40.0, 10.0, 0.0, 0.0, 0.0);
        assert!((p.times_interest_earned - -2.0).abs() < 1e-9);
        assert!((p.operating_margin_pct - -20.0).abs() < 1e-9);
    }

    #[test]
    fn curve_is_half_open_with_fixed_step() {
        let curve = BreakevenCurve::new(80.0, 120.0, 4, 50.0, 0.5);
        assert_eq!(curve.len(), 4);
        let sales: Vec<f64> = curve.map(|p| p.sales).collect();
        assert_eq!(sales, vec![80.0, 90.0, 100.0, 110.0]);
    }

    #[test]
    fn empty_range_yields_no_points() {
        assert_eq!(BreakevenCurve::new(0.0, 0.0, 10, 0.0, 0.0).count(), 0);
        assert_eq!(BreakevenCurve::new(0.0, 10.0, 0, 0.0, 0.0).count(), 0);
    }
}
