//! Financial ledger entry model.
//!
//! # Invariants
//! - Entries are append-only; only employee removal deletes them.
//! - `amount` is signed: negative values are debits.

use super::employee::EmployeeId;
use super::validation::{require_non_empty, validate_date_range, ValidationError};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store-assigned ledger entry identifier.
pub type RecordId = i64;

/// One ledger entry tied to an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub id: RecordId,
    pub employee_id: EmployeeId,
    pub description: String,
    pub amount: Decimal,
    /// Category tag such as `bonus`, `reimbursement` or `deduction`.
    pub record_type: String,
    pub record_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFinancialRecord {
    pub employee_id: EmployeeId,
    pub description: String,
    pub amount: Decimal,
    pub record_type: String,
    pub record_date: NaiveDateTime,
}

impl NewFinancialRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("description", &self.description)?;
        require_non_empty("record type", &self.record_type)?;
        validate_date_range("record date", self.record_date.date())?;
        Ok(())
    }
}
