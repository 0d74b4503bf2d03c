//! Delinquency scoring.
//!
//! RULE: No trained model exists. `RandomRiskEstimator` is a placeholder
//! that ignores its inputs and draws a uniform value. Every estimate it
//! produces is marked `validated: false` and must never be presented as
//! a prediction. A real model plugs in by implementing `RiskEstimator`.

use crate::{config::RiskConfig, rng::DeskRng, types::FundUse};
use serde::{Deserialize, Serialize};

/// Inputs a scoring model would consume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskFeatures {
    pub fund_use: FundUse,
    pub loan_amount: Option<f64>,
    pub equity_ratio_pct: f64,
    pub times_interest_earned: f64,
    pub operating_margin_pct: f64,
    pub safety_margin_pct: Option<f64>,
}

/// Anything that can turn applicant features into a delinquency percentage.
pub trait RiskEstimator {
    /// Stable name recorded alongside each estimate.
    fn name(&self) -> &'static str;

    /// Whether the estimator has been validated against outcomes.
    fn is_validated(&self) -> bool {
        false
    }

    /// Delinquency probability in percent.
    fn estimate(&mut self, features: &RiskFeatures) -> f64;
}

/// Uniform draw in `[min_pct, max_pct]`, independent of the features.
pub struct RandomRiskEstimator {
    rng: DeskRng,
    min_pct: f64,
    max_pct: f64,
}

impl RandomRiskEstimator {
    pub fn new(seed: u64, min_pct: f64, max_pct: f64) -> Self {
        Self {
            rng: DeskRng::new(seed),
            min_pct,
            max_pct,
        }
    }

    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(config.seed, config.min_probability_pct, config.max_probability_pct)
    }
}

impl RiskEstimator for RandomRiskEstimator {
    fn name(&self) -> &'static str {
        "random_placeholder"
    }

    fn estimate(&mut self, _features: &RiskFeatures) -> f64 {
        self.rng.uniform(self.min_pct, self.max_pct)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    High,
    Low,
}

impl RiskLabel {
    /// Strictly above the threshold is high risk.
    pub fn classify(probability_pct: f64, threshold_pct: f64) -> Self {
        if probability_pct > threshold_pct {
            Self::High
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DelinquencyEstimate {
    pub probability_pct: f64,
    pub label: RiskLabel,
    pub estimator: String,
    pub validated: bool,
}

/// Run `estimator` and clamp its answer into the configured bounds.
pub fn estimate_delinquency_probability<E: RiskEstimator + ?Sized>(
    estimator: &mut E,
    features: &RiskFeatures,
    config: &RiskConfig,
) -> DelinquencyEstimate {
    let raw = estimator.estimate(features);
    let probability_pct = if raw.is_nan() {
        config.min_probability_pct
    } else {
        raw.clamp(config.min_probability_pct, config.max_probability_pct)
    };
    let validated = estimator.is_validated();
    if !validated {
        log::warn!(
            "risk: {} returned {:.2}% (placeholder, not a prediction)",
            estimator.name(),
            probability_pct
        );
    }
    DelinquencyEstimate {
        probability_pct,
        label: RiskLabel::classify(probability_pct, config.high_risk_threshold_pct),
        estimator: estimator.name().to_string(),
        validated,
    }
}
