//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Isolate SQL details from service/business orchestration.
//!
//! # Invariants
//! - Repositories never open transactions; services own transaction scope.
//! - Write paths validate entities before SQL mutations.
//! - Money columns are stored as decimal TEXT and parsed back exactly.
//! - Read paths reject unparsable persisted values instead of masking them.

use crate::db::DbError;
use crate::model::employee::EmployeeId;
use crate::model::financial_record::RecordId;
use crate::model::payroll::PayrollId;
use crate::model::tax::TaxId;
use crate::model::validation::ValidationError;
use rusqlite::Row;
use rust_decimal::Decimal;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

pub mod employee_repo;
pub mod financial_record_repo;
pub mod payroll_repo;
pub mod tax_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Identifies the row a repository could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Employee(EmployeeId),
    Payroll(PayrollId),
    Tax(TaxId),
    FinancialRecord(RecordId),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Employee(id) => write!(f, "employee {id}"),
            Self::Payroll(id) => write!(f, "payroll {id}"),
            Self::Tax(id) => write!(f, "tax record {id}"),
            Self::FinancialRecord(id) => write!(f, "financial record {id}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{0} not found")]
    NotFound(EntityRef),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn decimal_to_db(value: Decimal) -> String {
    value.to_string()
}

pub(crate) fn decimal_column(row: &Row<'_>, table: &str, column: &str) -> RepoResult<Decimal> {
    let text: String = row.get(column)?;
    Decimal::from_str(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid decimal `{text}` in {table}.{column}"))
    })
}
