//! Domain services.
//!
//! # Responsibility
//! - Enforce business rules (existence checks, validation, payroll and tax
//!   computation) above the repository layer.
//! - Map repository failures onto the caller-facing error kinds.
//!
//! # Invariants
//! - Services hold no state between calls.
//! - Every writing call runs in exactly one store transaction; any error
//!   rolls the whole call back.

use crate::db::DbError;
use crate::model::employee::EmployeeId;
use crate::model::financial_record::RecordId;
use crate::model::payroll::PayrollId;
use crate::model::tax::TaxId;
use crate::model::validation::ValidationError;
use crate::policy::CompensationPolicy;
use crate::repo::{EntityRef, RepoError};
use rusqlite::{Connection, ErrorCode, Transaction};
use thiserror::Error;

pub mod employee_service;
pub mod financial_record_service;
pub mod payroll_service;
pub mod tax_service;

use employee_service::EmployeeService;
use financial_record_service::FinancialRecordService;
use payroll_service::PayrollService;
use tax_service::TaxService;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    ComputationFailure,
    ConnectionFailure,
    /// Any other database fault, including unreadable persisted data.
    Storage,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("employee not found: {0}")]
    EmployeeNotFound(EmployeeId),
    #[error("payroll not found: {0}")]
    PayrollNotFound(PayrollId),
    #[error("tax record not found: {0}")]
    TaxNotFound(TaxId),
    #[error("financial record not found: {0}")]
    FinancialRecordNotFound(RecordId),
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    #[error("payroll generation failed: {0}")]
    PayrollGeneration(String),
    #[error("tax calculation failed: {0}")]
    TaxCalculation(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmployeeNotFound(_)
            | Self::PayrollNotFound(_)
            | Self::TaxNotFound(_)
            | Self::FinancialRecordNotFound(_) => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::PayrollGeneration(_) | Self::TaxCalculation(_) => ErrorKind::ComputationFailure,
            Self::Repo(RepoError::Db(err)) if is_connection_failure(err) => {
                ErrorKind::ConnectionFailure
            }
            Self::Repo(_) => ErrorKind::Storage,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(EntityRef::Employee(id)) => Self::EmployeeNotFound(id),
            RepoError::NotFound(EntityRef::Payroll(id)) => Self::PayrollNotFound(id),
            RepoError::NotFound(EntityRef::Tax(id)) => Self::TaxNotFound(id),
            RepoError::NotFound(EntityRef::FinancialRecord(id)) => {
                Self::FinancialRecordNotFound(id)
            }
            RepoError::Validation(err) => Self::InvalidInput(err),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

fn is_connection_failure(err: &DbError) -> bool {
    match err {
        DbError::Connection { .. } => true,
        DbError::Sqlite(rusqlite::Error::SqliteFailure(failure, _)) => matches!(
            failure.code,
            ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::NotADatabase
                | ErrorCode::SystemIoFailure
        ),
        _ => false,
    }
}

/// Runs `work` inside one transaction, committing only on success.
///
/// Dropping the uncommitted transaction on error rolls it back.
pub(crate) fn in_transaction<T>(
    conn: &Connection,
    work: impl FnOnce(&Transaction<'_>) -> ServiceResult<T>,
) -> ServiceResult<T> {
    let tx = conn.unchecked_transaction()?;
    let value = work(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// The four domain services, built once and shared by reference.
pub struct PayrollServices<'a> {
    pub employees: EmployeeService<'a>,
    pub payroll: PayrollService<'a>,
    pub tax: TaxService<'a>,
    pub financial_records: FinancialRecordService<'a>,
}

impl<'a> PayrollServices<'a> {
    pub fn new(conn: &'a Connection, policy: &'a CompensationPolicy) -> Self {
        Self {
            employees: EmployeeService::new(conn),
            payroll: PayrollService::new(conn, policy),
            tax: TaxService::new(conn, policy),
            financial_records: FinancialRecordService::new(conn),
        }
    }
}
