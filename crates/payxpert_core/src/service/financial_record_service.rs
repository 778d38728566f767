//! Financial ledger use-case service.
//!
//! # Invariants
//! - Entries need an existing employee, a non-blank description and type,
//!   and a well-formed decimal amount. Negative amounts are debits.
//! - Record dates are truncated to whole seconds.

use super::{in_transaction, ServiceError, ServiceResult};
use crate::model::employee::EmployeeId;
use crate::model::financial_record::{FinancialRecord, NewFinancialRecord, RecordId};
use crate::model::validation::parse_amount;
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::financial_record_repo::{
    FinancialRecordRepository, SqliteFinancialRecordRepository,
};
use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use log::info;
use rusqlite::Connection;

pub struct FinancialRecordService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> FinancialRecordService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Appends a ledger entry dated now (local time).
    ///
    /// `amount` is the operator's text, e.g. `"250.00"` or `"-40"`.
    pub fn add_financial_record(
        &self,
        employee_id: EmployeeId,
        description: &str,
        amount: &str,
        record_type: &str,
    ) -> ServiceResult<FinancialRecord> {
        self.add_financial_record_at(
            employee_id,
            description,
            amount,
            record_type,
            Local::now().naive_local(),
        )
    }

    /// Appends a ledger entry with an explicit timestamp.
    pub fn add_financial_record_at(
        &self,
        employee_id: EmployeeId,
        description: &str,
        amount: &str,
        record_type: &str,
        recorded_at: NaiveDateTime,
    ) -> ServiceResult<FinancialRecord> {
        let record = NewFinancialRecord {
            employee_id,
            description: description.trim().to_string(),
            amount: parse_amount(amount)?,
            record_type: record_type.trim().to_string(),
            record_date: recorded_at.trunc_subsecs(0),
        };
        record.validate()?;

        let stored = in_transaction(self.conn, |tx| {
            if !SqliteEmployeeRepository::new(tx).employee_exists(employee_id)? {
                return Err(ServiceError::EmployeeNotFound(employee_id));
            }
            Ok(SqliteFinancialRecordRepository::new(tx).create_record(&record)?)
        })?;

        info!(
            "event=financial_record_add module=service status=ok employee_id={} record_id={} record_type={}",
            employee_id, stored.id, stored.record_type
        );
        Ok(stored)
    }

    pub fn get_financial_record_by_id(&self, id: RecordId) -> ServiceResult<FinancialRecord> {
        SqliteFinancialRecordRepository::new(self.conn)
            .get_record(id)?
            .ok_or(ServiceError::FinancialRecordNotFound(id))
    }

    /// Entries for an existing employee, oldest first.
    pub fn get_financial_records_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> ServiceResult<Vec<FinancialRecord>> {
        if !SqliteEmployeeRepository::new(self.conn).employee_exists(employee_id)? {
            return Err(ServiceError::EmployeeNotFound(employee_id));
        }
        Ok(SqliteFinancialRecordRepository::new(self.conn).list_for_employee(employee_id)?)
    }

    /// Entries recorded on `date`, whatever the time of day.
    pub fn get_financial_records_for_date(
        &self,
        date: NaiveDate,
    ) -> ServiceResult<Vec<FinancialRecord>> {
        Ok(SqliteFinancialRecordRepository::new(self.conn).list_for_date(date)?)
    }
}
