//! Core domain logic for PayXpert.
//! This crate is the single source of truth for payroll and HR invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;

pub use db::{
    open_db, open_db_in_memory, ConnectionProvider, DbError, DbResult, DbTarget,
    SqliteConnectionProvider,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::employee::{Employee, EmployeeId, EmployeeProfile};
pub use model::financial_record::{FinancialRecord, NewFinancialRecord, RecordId};
pub use model::payroll::{NewPayroll, Payroll, PayrollId};
pub use model::tax::{NewTax, Tax, TaxId};
pub use model::validation::{
    parse_amount, parse_date, parse_optional_date, validate_date_range, ValidationError,
    DATE_FORMAT,
};
pub use policy::{CompensationPolicy, PayRateTable, PolicyError, TaxBracket, TaxTable};
pub use repo::employee_repo::{DependentCounts, EmployeeRepository, SqliteEmployeeRepository};
pub use repo::financial_record_repo::{
    FinancialRecordRepository, SqliteFinancialRecordRepository,
};
pub use repo::payroll_repo::{PayrollRepository, SqlitePayrollRepository};
pub use repo::tax_repo::{SqliteTaxRepository, TaxRepository};
pub use repo::{EntityRef, RepoError, RepoResult};
pub use service::employee_service::EmployeeService;
pub use service::financial_record_service::FinancialRecordService;
pub use service::payroll_service::PayrollService;
pub use service::tax_service::TaxService;
pub use service::{ErrorKind, PayrollServices, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
