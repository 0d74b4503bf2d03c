//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The desk and the runner call store methods; they never execute SQL directly.

use crate::error::{DeskError, DeskResult};
use rusqlite::Connection;

mod applicant;

/// Ordered schema migrations. Index + 1 is the schema version they produce.
/// NEVER reorder or edit an entry; only append.
const MIGRATIONS: [(&str, &str); 2] = [
    ("001_applicants", include_str!("../../../migrations/001_applicants.sql")),
    ("002_loan_terms", include_str!("../../../migrations/002_loan_terms.sql")),
];

/// Latest schema version this build knows about.
pub const SCHEMA_VERSION: i64 = MIGRATIONS.len() as i64;

pub struct ApplicantStore {
    conn: Connection,
}

impl ApplicantStore {
    /// Open (or create) the applicant database at `path`.
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open(path)?;
        // WAL is ignored by in-memory databases, so a failure here is not fatal.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Create the applicant table if absent and bring it to the latest schema.
    pub fn migrate(&self) -> DeskResult<()> {
        self.migrate_to(SCHEMA_VERSION)
    }

    /// Apply pending migrations up to and including `target`.
    /// Already-applied versions are skipped, so calling this twice is harmless.
    pub fn migrate_to(&self, target: i64) -> DeskResult<()> {
        if !(0..=SCHEMA_VERSION).contains(&target) {
            return Err(DeskError::UnknownSchemaVersion { found: target });
        }
        let current = self.schema_version()?;
        if current > SCHEMA_VERSION {
            return Err(DeskError::UnknownSchemaVersion { found: current });
        }

        for (index, (name, sql)) in MIGRATIONS.iter().enumerate() {
            let version = index as i64 + 1;
            if version <= current || version > target {
                continue;
            }
            let tx = self.conn.unchecked_transaction()?;
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", version)?;
            tx.commit()?;
            log::info!("store: applied migration {name} (schema v{version})");
        }
        Ok(())
    }

    pub fn schema_version(&self) -> DeskResult<i64> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// True once loan-term columns exist.
    pub(crate) fn has_loan_terms(&self) -> DeskResult<bool> {
        Ok(self.schema_version()? >= 2)
    }
}
