//! Applicant store tests.

use pyme_core::applicant::{Financials, LoanTerms, NewApplicant};
use pyme_core::error::DeskError;
use pyme_core::store::{ApplicantStore, SCHEMA_VERSION};
use pyme_core::types::{FundUse, Sector};

fn store() -> ApplicantStore {
    let store = ApplicantStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
}

fn bakery(name: &str) -> NewApplicant {
    NewApplicant::new(name, Sector::Bakery, FundUse::WorkingCapital).with_financials(Financials {
        annual_sales: 1000.0,
        cost_of_sales: 600.0,
        admin_costs: 100.0,
        financial_costs: 50.0,
        current_assets: 500.0,
        fixed_assets: 300.0,
        liabilities: 400.0,
        equity: 200.0,
    })
}

#[test]
fn ids_are_sequential_and_restart_after_delete_all() {
    let store = store();
    assert_eq!(store.insert(&bakery("Panadería Sol")).unwrap(), 1);
    assert_eq!(store.insert(&bakery("Panadería Luna")).unwrap(), 2);

    let removed = store.delete_all().unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.count().unwrap(), 0);

    assert_eq!(
        store.insert(&bakery("Panadería Estrella")).unwrap(),
        1,
        "numbering must restart at 1 after a bulk delete"
    );
}

#[test]
fn round_trips_every_field() {
    let store = store();
    let applicant = bakery("Herrería Norte")
        .with_loan(LoanTerms {
            amount: 25_000.0,
            term_months: 18,
            annual_rate_pct: 14.5,
            employee_count: 6,
        })
        .with_late_payment(true);
    let id = store.insert(&applicant).unwrap();

    let record = store.get_by_id(id).unwrap().expect("record should exist");
    assert_eq!(record.id, id);
    assert_eq!(record.applicant, applicant);
}

#[test]
fn missing_id_reads_as_none() {
    let store = store();
    store.insert(&bakery("Comedor Central")).unwrap();
    assert!(store.get_by_id(99).unwrap().is_none());
}

#[test]
fn get_all_is_in_id_order() {
    let store = store();
    for name in ["A", "B", "C"] {
        store.insert(&bakery(name)).unwrap();
    }
    let names: Vec<_> = store
        .get_all()
        .unwrap()
        .into_iter()
        .map(|r| (r.id, r.applicant.name))
        .collect();
    assert_eq!(
        names,
        vec![(1, "A".to_string()), (2, "B".to_string()), (3, "C".to_string())]
    );
}

#[test]
fn migrate_is_idempotent() {
    let store = store();
    store.insert(&bakery("Taller Sur")).unwrap();
    store.migrate().unwrap();
    assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    assert_eq!(store.count().unwrap(), 1);
}

/// Records created under schema v1 keep no loan terms after upgrading.
#[test]
fn version_one_records_have_no_loan_terms() {
    let store = ApplicantStore::in_memory().unwrap();
    store.migrate_to(1).unwrap();
    assert_eq!(store.schema_version().unwrap(), 1);

    let id = store.insert(&bakery("Corte Fino")).unwrap();
    let with_loan = bakery("Corte Grueso").with_loan(LoanTerms {
        amount: 1.0,
        term_months: 1,
        annual_rate_pct: 1.0,
        employee_count: 1,
    });
    assert!(matches!(
        store.insert(&with_loan),
        Err(DeskError::InvalidInput { .. })
    ));

    store.migrate().unwrap();
    let record = store.get_by_id(id).unwrap().unwrap();
    assert!(record.applicant.loan.is_none());
}

#[test]
fn rejects_invalid_input() {
    let store = store();
    let blank = bakery("   ");
    assert!(matches!(store.insert(&blank), Err(DeskError::InvalidInput { .. })));

    let mut negative = bakery("Comercio Sur");
    negative.financials.liabilities = -1.0;
    match store.insert(&negative) {
        Err(DeskError::InvalidInput { field, .. }) => assert_eq!(field, "liabilities"),
        other => panic!("expected invalid input, got {other:?}"),
    }

    let mut nan = bakery("Comercio Este");
    nan.financials.equity = f64::NAN;
    assert!(store.insert(&nan).is_err());
    assert_eq!(store.count().unwrap(), 0, "rejected rows must not be stored");
}

#[test]
fn unknown_target_version_is_rejected() {
    let store = ApplicantStore::in_memory().unwrap();
    assert!(matches!(
        store.migrate_to(SCHEMA_VERSION + 1),
        Err(DeskError::UnknownSchemaVersion { .. })
    ));
}
