use thiserror::Error;

use crate::types::RecordId;

/// Failures of the break-even calculation. Liquidity and profitability
/// ratios never produce these; they substitute guarded denominators instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Break-even undefined: {reason}")]
    Undefined { reason: String },

    #[error("Infeasible cost structure: cost of sales consumes {:.1}% of revenue", .variable_ratio * 100.0)]
    InfeasibleCostStructure { variable_ratio: f64 },
}

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("No applicant found with id {id}")]
    RecordNotFound { id: RecordId },

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown schema version {found}")]
    UnknownSchemaVersion { found: i64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DeskResult<T> = Result<T, DeskError>;
