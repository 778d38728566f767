//! Payroll/HR domain model.
//!
//! # Responsibility
//! - Define the records persisted by core: employees, payrolls, tax entries
//!   and ledger entries.
//! - Own input validation shared by services and the shell.
//!
//! # Invariants
//! - Identifiers are assigned by the store and never reused.
//! - Money is `Decimal`, never floating point.

pub mod employee;
pub mod financial_record;
pub mod payroll;
pub mod tax;
pub mod validation;
