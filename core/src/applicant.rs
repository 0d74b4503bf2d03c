//! Applicant records as captured by the intake form.

use crate::{
    error::{DeskError, DeskResult},
    types::{FundUse, RecordId, Sector},
};
use serde::{Deserialize, Serialize};

/// Loan request metadata. Only present for records created after
/// schema version 2; older rows read back as `None`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LoanTerms {
    pub amount: f64,
    pub term_months: u32,
    pub annual_rate_pct: f64,
    pub employee_count: u32,
}

/// Balance-sheet and income-statement figures. Missing inputs are zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Financials {
    pub annual_sales: f64,
    pub cost_of_sales: f64,
    pub admin_costs: f64,
    pub financial_costs: f64,
    pub current_assets: f64,
    pub fixed_assets: f64,
    pub liabilities: f64,
    pub equity: f64,
}

impl Financials {
    fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("annual_sales", self.annual_sales),
            ("cost_of_sales", self.cost_of_sales),
            ("admin_costs", self.admin_costs),
            ("financial_costs", self.financial_costs),
            ("current_assets", self.current_assets),
            ("fixed_assets", self.fixed_assets),
            ("liabilities", self.liabilities),
            ("equity", self.equity),
        ]
    }
}

/// An applicant before the store assigns it an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewApplicant {
    pub name: String,
    pub sector: Sector,
    pub fund_use: FundUse,
    #[serde(default)]
    pub loan: Option<LoanTerms>,
    #[serde(default)]
    pub financials: Financials,
    #[serde(default)]
    pub late_payment: bool,
}

impl NewApplicant {
    pub fn new(name: impl Into<String>, sector: Sector, fund_use: FundUse) -> Self {
        Self {
            name: name.into(),
            sector,
            fund_use,
            loan: None,
            financials: Financials::default(),
            late_payment: false,
        }
    }

    pub fn with_financials(mut self, financials: Financials) -> Self {
        self.financials = financials;
        self
    }

    pub fn with_loan(mut self, loan: LoanTerms) -> Self {
        self.loan = Some(loan);
        self
    }

    pub fn with_late_payment(mut self, late_payment: bool) -> Self {
        self.late_payment = late_payment;
        self
    }

    /// Reject blank names and negative or non-finite figures.
    pub fn validate(&self) -> DeskResult<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("name", "must not be blank"));
        }
        for (field, value) in self.financials.fields() {
            check_amount(field, value)?;
        }
        if let Some(loan) = &self.loan {
            check_amount("loan.amount", loan.amount)?;
            check_amount("loan.annual_rate_pct", loan.annual_rate_pct)?;
        }
        Ok(())
    }
}

fn check_amount(field: &str, value: f64) -> DeskResult<()> {
    if !value.is_finite() {
        return Err(invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(invalid(field, "must not be negative"));
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> DeskError {
    DeskError::InvalidInput {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// A stored applicant. Ratios are never persisted; they are derived on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicantRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub applicant: NewApplicant,
}

impl ApplicantRecord {
    pub fn financials(&self) -> &Financials {
        &self.applicant.financials
    }
}
