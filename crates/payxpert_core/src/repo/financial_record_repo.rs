//! Financial ledger repository contract and SQLite implementation.
//!
//! # Invariants
//! - The ledger is append-only: no update or delete paths exist here.
//! - Listings are ordered by `record_date ASC, id ASC`.
//! - Date lookups compare the calendar-date prefix of `record_date`.

use super::{decimal_column, decimal_to_db, RepoResult};
use crate::model::employee::EmployeeId;
use crate::model::financial_record::{FinancialRecord, NewFinancialRecord, RecordId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Params, Row};

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    employee_id,
    description,
    amount,
    type,
    record_date
FROM financial_record";

pub trait FinancialRecordRepository {
    fn create_record(&self, record: &NewFinancialRecord) -> RepoResult<FinancialRecord>;
    fn get_record(&self, id: RecordId) -> RepoResult<Option<FinancialRecord>>;
    fn list_for_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<FinancialRecord>>;
    /// Records dated on `date`, any time of day.
    fn list_for_date(&self, date: NaiveDate) -> RepoResult<Vec<FinancialRecord>>;
    fn count_records(&self) -> RepoResult<i64>;
}

/// SQLite-backed ledger repository.
pub struct SqliteFinancialRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFinancialRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_records(&self, sql: &str, bind: impl Params) -> RepoResult<Vec<FinancialRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }
}

impl FinancialRecordRepository for SqliteFinancialRecordRepository<'_> {
    fn create_record(&self, record: &NewFinancialRecord) -> RepoResult<FinancialRecord> {
        record.validate()?;

        let description = record.description.trim();
        let record_type = record.record_type.trim();
        self.conn.execute(
            "INSERT INTO financial_record (
                employee_id,
                description,
                amount,
                type,
                record_date
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.employee_id,
                description,
                decimal_to_db(record.amount),
                record_type,
                record.record_date,
            ],
        )?;

        Ok(FinancialRecord {
            id: self.conn.last_insert_rowid(),
            employee_id: record.employee_id,
            description: description.to_string(),
            amount: record.amount,
            record_type: record_type.to_string(),
            record_date: record.record_date,
        })
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<FinancialRecord>> {
        let mut records =
            self.query_records(&format!("{RECORD_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(records.pop())
    }

    fn list_for_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<FinancialRecord>> {
        self.query_records(
            &format!(
                "{RECORD_SELECT_SQL}
                 WHERE employee_id = ?1
                 ORDER BY record_date ASC, id ASC;"
            ),
            [employee_id],
        )
    }

    fn list_for_date(&self, date: NaiveDate) -> RepoResult<Vec<FinancialRecord>> {
        self.query_records(
            &format!(
                "{RECORD_SELECT_SQL}
                 WHERE substr(record_date, 1, 10) = ?1
                 ORDER BY record_date ASC, id ASC;"
            ),
            [date],
        )
    }

    fn count_records(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM financial_record;", [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<FinancialRecord> {
    Ok(FinancialRecord {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        description: row.get("description")?,
        amount: decimal_column(row, "financial_record", "amount")?,
        record_type: row.get("type")?,
        record_date: row.get("record_date")?,
    })
}
