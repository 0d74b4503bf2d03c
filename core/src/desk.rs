//! The credit desk: one request in, one result out.
//!
//! RULES:
//!   - The desk never owns a store. Every call receives the store handle
//!     it should use, so callers decide how long a connection lives.
//!   - Ratios are derived on every read and never written back.
//!   - Each call is independent; a failure affects only that request.

use crate::{
    applicant::{ApplicantRecord, NewApplicant},
    config::DeskConfig,
    error::{AnalysisError, DeskError, DeskResult},
    portfolio::{Benchmark, PortfolioAverages, RecordRatios},
    ratios::{Breakeven, CurvePoint, LiquidityRatios, ProfitabilityRatios},
    risk::{estimate_delinquency_probability, DelinquencyEstimate, RiskEstimator, RiskFeatures},
    store::ApplicantStore,
    types::RecordId,
    warnings::{assess, Warning},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BreakevenOutcome {
    Available(Breakeven),
    Unavailable { reason: String },
}

impl From<&Result<Breakeven, AnalysisError>> for BreakevenOutcome {
    fn from(result: &Result<Breakeven, AnalysisError>) -> Self {
        match result {
            Ok(b) => Self::Available(*b),
            Err(e) => Self::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

/// Everything a loan officer sees for one applicant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantAnalysis {
    pub record: ApplicantRecord,
    pub liquidity: LiquidityRatios,
    pub profitability: ProfitabilityRatios,
    pub breakeven: BreakevenOutcome,
    /// Empty when break-even is unavailable.
    pub chart: Vec<CurvePoint>,
    pub benchmark: Benchmark,
    pub portfolio: PortfolioAverages,
    pub warnings: Vec<Warning>,
    pub risk: DelinquencyEstimate,
}

pub struct CreditDesk<E: RiskEstimator> {
    config: DeskConfig,
    estimator: E,
}

impl<E: RiskEstimator> CreditDesk<E> {
    pub fn new(config: DeskConfig, estimator: E) -> Self {
        Self { config, estimator }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn register(&self, store: &ApplicantStore, applicant: &NewApplicant) -> DeskResult<RecordId> {
        store.insert(applicant)
    }

    pub fn lookup(&self, store: &ApplicantStore, id: RecordId) -> DeskResult<ApplicantRecord> {
        store.get_by_id(id)?.ok_or(DeskError::RecordNotFound { id })
    }

    /// Full analysis of one applicant benchmarked against every stored record.
    pub fn analyze(&mut self, store: &ApplicantStore, id: RecordId) -> DeskResult<ApplicantAnalysis> {
        let record = self.lookup(store, id)?;
        let all = store.get_all()?;
        // `record` came from the same store, so the portfolio is never empty.
        let portfolio = PortfolioAverages::compute(&all).ok_or(DeskError::RecordNotFound { id })?;

        let ratios = RecordRatios::compute(&record);
        let chart = match &ratios.breakeven {
            Ok(b) => {
                let chart = &self.config.chart;
                b.curve(chart.low_factor, chart.high_factor, chart.steps).collect()
            }
            Err(_) => Vec::new(),
        };
        let warnings = assess(&ratios, record.applicant.late_payment, &self.config.thresholds);
        for warning in &warnings {
            log::debug!("desk: applicant {id}: {}", warning.message());
        }

        let features = RiskFeatures {
            fund_use: record.applicant.fund_use,
            loan_amount: record.applicant.loan.map(|l| l.amount),
            equity_ratio_pct: ratios.profitability.equity_ratio_pct,
            times_interest_earned: ratios.profitability.times_interest_earned,
            operating_margin_pct: ratios.profitability.operating_margin_pct,
            safety_margin_pct: ratios.safety_margin_pct(),
        };
        let risk = estimate_delinquency_probability(&mut self.estimator, &features, &self.config.risk);

        log::info!(
            "desk: analyzed applicant {id} ({} warnings, benchmarked against {} records)",
            warnings.len(),
            portfolio.record_count
        );

        Ok(ApplicantAnalysis {
            liquidity: ratios.liquidity,
            profitability: ratios.profitability,
            breakeven: BreakevenOutcome::from(&ratios.breakeven),
            chart,
            benchmark: Benchmark::new(&ratios, &portfolio),
            portfolio,
            warnings,
            risk,
            record,
        })
    }

    pub fn portfolio(&self, store: &ApplicantStore) -> DeskResult<Option<PortfolioAverages>> {
        Ok(PortfolioAverages::compute(&store.get_all()?))
    }

    /// Drop every applicant. Numbering restarts at 1.
    pub fn reset(&self, store: &ApplicantStore) -> DeskResult<usize> {
        store.delete_all()
    }
}
