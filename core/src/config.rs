use crate::error::{DeskError, DeskResult};
use serde::{Deserialize, Serialize};

/// Warning thresholds for a single applicant's ratios.
///
/// Fractions are compared against fraction-valued ratios and
/// percentages against percentage-valued ones. Never mix the two.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    /// Warn when current ratio is below this.
    pub min_current_ratio: f64,
    /// Warn when equity / total assets (fraction) is below this.
    pub min_equity_ratio: f64,
    /// Warn when times-interest-earned is below this.
    pub min_times_interest_earned: f64,
    /// Warn when operating margin (%) is at or below this.
    pub min_operating_margin_pct: f64,
    /// Warn when margin of safety (%) is below this.
    pub min_safety_margin_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskConfig {
    pub min_probability_pct: f64,
    pub max_probability_pct: f64,
    /// Estimates above this are labelled high risk. Display only.
    pub high_risk_threshold_pct: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartConfig {
    pub low_factor: f64,
    pub high_factor: f64,
    pub steps: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeskConfig {
    pub thresholds: Thresholds,
    pub risk: RiskConfig,
    pub chart: ChartConfig,
}

impl DeskConfig {
    /// Load from `{data_dir}/desk_config.json`.
    /// In tests, use DeskConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/desk_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DeskConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_test() -> Self {
        Self {
            thresholds: Thresholds {
                min_current_ratio: 1.0,
                min_equity_ratio: 0.40,
                min_times_interest_earned: 1.3,
                min_operating_margin_pct: 0.0,
                min_safety_margin_pct: 10.0,
            },
            risk: RiskConfig {
                min_probability_pct: 0.1,
                max_probability_pct: 25.0,
                high_risk_threshold_pct: 12.0,
                seed: 42,
            },
            chart: ChartConfig {
                low_factor: 0.8,
                high_factor: 1.2,
                steps: 40,
            },
        }
    }

    pub fn validate(&self) -> DeskResult<()> {
        let risk = &self.risk;
        if !(risk.min_probability_pct >= 0.0 && risk.min_probability_pct < risk.max_probability_pct) {
            return Err(invalid(
                "risk.min_probability_pct",
                "must be non-negative and below max_probability_pct",
            ));
        }
        if risk.max_probability_pct > 100.0 {
            return Err(invalid("risk.max_probability_pct", "must not exceed 100"));
        }
        let chart = &self.chart;
        if !(chart.low_factor >= 0.0 && chart.low_factor < chart.high_factor) {
            return Err(invalid("chart.low_factor", "must be non-negative and below high_factor"));
        }
        if chart.steps == 0 {
            return Err(invalid("chart.steps", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self::default_test()
    }
}

fn invalid(field: &str, reason: &str) -> DeskError {
    DeskError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}
