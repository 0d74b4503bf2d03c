use super::ApplicantStore;
use crate::{
    applicant::{ApplicantRecord, Financials, LoanTerms, NewApplicant},
    error::{DeskError, DeskResult},
    types::RecordId,
};
use rusqlite::{params, OptionalExtension, Row};

const BASE_COLUMNS: &str = "id, name, sector, fund_use,
    annual_sales, cost_of_sales, admin_costs, financial_costs,
    current_assets, fixed_assets, liabilities, equity, late_payment";

const LOAN_COLUMNS: &str = ", loan_amount, loan_term_months, loan_rate_pct, employee_count";

impl ApplicantStore {
    // ── Applicant ─────────────────────────────────────────────────

    /// Insert a new applicant and return its id.
    ///
    /// Ids are `MAX(id) + 1`, or 1 when the table is empty. Gaps are never
    /// reused and a bulk delete restarts numbering at 1.
    pub fn insert(&self, applicant: &NewApplicant) -> DeskResult<RecordId> {
        applicant.validate()?;
        let with_loan = self.has_loan_terms()?;
        if applicant.loan.is_some() && !with_loan {
            return Err(DeskError::InvalidInput {
                field: "loan".into(),
                reason: "schema version 1 has no loan columns".into(),
            });
        }

        let tx = self.conn.unchecked_transaction()?;
        let id: RecordId = tx.query_row(
            "SELECT COALESCE(MAX(id), 0) + 1 FROM applicant",
            [],
            |r| r.get(0),
        )?;

        let f = &applicant.financials;
        let sector = applicant.sector.key();
        let fund_use = applicant.fund_use.key();
        if with_loan {
            let loan = applicant.loan.as_ref();
            tx.execute(
                "INSERT INTO applicant (
                     id, name, sector, fund_use,
                     annual_sales, cost_of_sales, admin_costs, financial_costs,
                     current_assets, fixed_assets, liabilities, equity, late_payment,
                     loan_amount, loan_term_months, loan_rate_pct, employee_count
                 ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17)",
                params![
                    id, applicant.name, sector, fund_use,
                    f.annual_sales, f.cost_of_sales, f.admin_costs, f.financial_costs,
                    f.current_assets, f.fixed_assets, f.liabilities, f.equity,
                    applicant.late_payment as i32,
                    loan.map(|l| l.amount),
                    loan.map(|l| l.term_months),
                    loan.map(|l| l.annual_rate_pct),
                    loan.map(|l| l.employee_count),
                ],
            )?;
        } else {
            tx.execute(
                "INSERT INTO applicant (
                     id, name, sector, fund_use,
                     annual_sales, cost_of_sales, admin_costs, financial_costs,
                     current_assets, fixed_assets, liabilities, equity, late_payment
                 ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
                params![
                    id, applicant.name, sector, fund_use,
                    f.annual_sales, f.cost_of_sales, f.admin_costs, f.financial_costs,
                    f.current_assets, f.fixed_assets, f.liabilities, f.equity,
                    applicant.late_payment as i32,
                ],
            )?;
        }
        tx.commit()?;

        log::info!("store: applicant {id} '{}' registered", applicant.name);
        Ok(id)
    }

    pub fn get_by_id(&self, id: RecordId) -> DeskResult<Option<ApplicantRecord>> {
        let with_loan = self.has_loan_terms()?;
        let sql = format!("SELECT {} FROM applicant WHERE id = ?1", select_columns(with_loan));
        let mut stmt = self.conn.prepare(&sql)?;
        let record = stmt
            .query_row(params![id], |r| read_record(r, with_loan))
            .optional()?;
        Ok(record)
    }

    /// Every applicant in id order.
    pub fn get_all(&self) -> DeskResult<Vec<ApplicantRecord>> {
        let with_loan = self.has_loan_terms()?;
        let sql = format!("SELECT {} FROM applicant ORDER BY id ASC", select_columns(with_loan));
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([], |r| read_record(r, with_loan))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Remove every applicant. Returns how many rows were deleted.
    pub fn delete_all(&self) -> DeskResult<usize> {
        let removed = self.conn.execute("DELETE FROM applicant", [])?;
        log::warn!("store: bulk delete removed {removed} applicants");
        Ok(removed)
    }

    pub fn count(&self) -> DeskResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM applicant", [], |r| r.get(0))?)
    }
}

fn select_columns(with_loan: bool) -> String {
    if with_loan {
        format!("{BASE_COLUMNS}{LOAN_COLUMNS}")
    } else {
        BASE_COLUMNS.to_string()
    }
}

fn read_record(r: &Row<'_>, with_loan: bool) -> rusqlite::Result<ApplicantRecord> {
    let sector: String = r.get(2)?;
    let fund_use: String = r.get(3)?;

    let loan = if with_loan {
        let amount: Option<f64> = r.get(13)?;
        let term_months: Option<u32> = r.get(14)?;
        let annual_rate_pct: Option<f64> = r.get(15)?;
        let employee_count: Option<u32> = r.get(16)?;
        amount.map(|amount| LoanTerms {
            amount,
            term_months: term_months.unwrap_or(0),
            annual_rate_pct: annual_rate_pct.unwrap_or(0.0),
            employee_count: employee_count.unwrap_or(0),
        })
    } else {
        None
    };

    Ok(ApplicantRecord {
        id: r.get(0)?,
        applicant: NewApplicant {
            name: r.get(1)?,
            sector: sector.parse().map_err(|e| text_error(2, e))?,
            fund_use: fund_use.parse().map_err(|e| text_error(3, e))?,
            loan,
            financials: Financials {
                annual_sales: r.get(4)?,
                cost_of_sales: r.get(5)?,
                admin_costs: r.get(6)?,
                financial_costs: r.get(7)?,
                current_assets: r.get(8)?,
                fixed_assets: r.get(9)?,
                liabilities: r.get(10)?,
                equity: r.get(11)?,
            },
            late_payment: r.get::<_, i32>(12)? != 0,
        },
    })
}

fn text_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        message.into(),
    )
}
