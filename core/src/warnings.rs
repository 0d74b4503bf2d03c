//! Warning flags raised for a single applicant.

use crate::{config::Thresholds, portfolio::RecordRatios};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    LowCurrentRatio { value: f64, minimum: f64 },
    LowEquityRatio { value: f64, minimum: f64 },
    WeakInterestCoverage { value: f64, minimum: f64 },
    NegativeOperatingMargin { value_pct: f64 },
    ThinSafetyMargin { value_pct: f64, minimum_pct: f64 },
    BreakevenUnavailable { reason: String },
    LatePaymentHistory,
}

impl Warning {
    pub fn message(&self) -> String {
        match self {
            Self::LowCurrentRatio { value, minimum } => format!(
                "Current ratio {value:.2} is below {minimum:.2}: short-term liabilities may not be covered"
            ),
            Self::LowEquityRatio { value, minimum } => format!(
                "Equity ratio {:.1}% is below {:.1}%: the business is heavily leveraged",
                value * 100.0,
                minimum * 100.0
            ),
            Self::WeakInterestCoverage { value, minimum } => format!(
                "Times interest earned {value:.2} is below {minimum:.2}: operating income barely covers financial costs"
            ),
            Self::NegativeOperatingMargin { value_pct } => {
                format!("Operating margin is {value_pct:.1}%: operations are not profitable")
            }
            Self::ThinSafetyMargin { value_pct, minimum_pct } => format!(
                "Margin of safety {value_pct:.1}% is below {minimum_pct:.1}%: sales sit close to break-even"
            ),
            Self::BreakevenUnavailable { reason } => format!("Break-even not available: {reason}"),
            Self::LatePaymentHistory => "The applicant has a history of late payments".to_string(),
        }
    }
}

/// Every threshold breach for one record, in a fixed order.
pub fn assess(ratios: &RecordRatios, late_payment: bool, thresholds: &Thresholds) -> Vec<Warning> {
    let mut warnings = Vec::new();

    let current = ratios.liquidity.current_ratio;
    if current < thresholds.min_current_ratio {
        warnings.push(Warning::LowCurrentRatio {
            value: current,
            minimum: thresholds.min_current_ratio,
        });
    }

    let equity = ratios.liquidity.equity_ratio;
    if equity < thresholds.min_equity_ratio {
        warnings.push(Warning::LowEquityRatio {
            value: equity,
            minimum: thresholds.min_equity_ratio,
        });
    }

    let tie = ratios.profitability.times_interest_earned;
    if tie < thresholds.min_times_interest_earned {
        warnings.push(Warning::WeakInterestCoverage {
            value: tie,
            minimum: thresholds.min_times_interest_earned,
        });
    }

    let margin = ratios.profitability.operating_margin_pct;
    if margin <= thresholds.min_operating_margin_pct {
        warnings.push(Warning::NegativeOperatingMargin { value_pct: margin });
    }

    match &ratios.breakeven {
        Ok(b) if b.safety_margin_pct < thresholds.min_safety_margin_pct => {
            warnings.push(Warning::ThinSafetyMargin {
                value_pct: b.safety_margin_pct,
                minimum_pct: thresholds.min_safety_margin_pct,
            });
        }
        Ok(_) => {}
        Err(e) => {
            warnings.push(Warning::BreakevenUnavailable {
                reason: e.to_string(),
            });
        }
    }

    if late_payment {
        warnings.push(Warning::LatePaymentHistory);
    }

    warnings
}
