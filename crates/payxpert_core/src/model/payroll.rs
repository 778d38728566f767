//! Payroll domain model.
//!
//! # Invariants
//! - `period_start <= period_end`.
//! - `net_amount == gross_amount - deductions`.
//! - Payrolls are never mutated after creation.

use super::employee::EmployeeId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store-assigned payroll identifier.
pub type PayrollId = i64;

/// Payroll entry for one employee and one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    pub id: PayrollId,
    pub employee_id: EmployeeId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub gross_amount: Decimal,
    /// Tax withheld from the gross amount.
    pub deductions: Decimal,
    pub net_amount: Decimal,
}

/// Computed payroll values awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayroll {
    pub employee_id: EmployeeId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub gross_amount: Decimal,
    pub deductions: Decimal,
    pub net_amount: Decimal,
}

impl Payroll {
    /// Whether this payroll's period intersects the closed range `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.period_start <= end && self.period_end >= start
    }
}
