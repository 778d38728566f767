//! Employee use-case service.
//!
//! # Responsibility
//! - Validate employee input before persistence.
//! - Provide get/list/add/update/remove entry points for callers.
//!
//! # Invariants
//! - `update_employee` on a missing id fails with `EmployeeNotFound` and
//!   writes nothing.
//! - `remove_employee` cascades to the employee's payroll, tax and ledger
//!   rows.

use super::{in_transaction, ServiceError, ServiceResult};
use crate::model::employee::{Employee, EmployeeId, EmployeeProfile};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use log::info;
use rusqlite::Connection;

pub struct EmployeeService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> EmployeeService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn get_employee_by_id(&self, id: EmployeeId) -> ServiceResult<Employee> {
        SqliteEmployeeRepository::new(self.conn)
            .get_employee(id)?
            .ok_or(ServiceError::EmployeeNotFound(id))
    }

    /// All employees ordered by id.
    pub fn get_all_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(SqliteEmployeeRepository::new(self.conn).list_employees()?)
    }

    /// Validates and inserts `profile`, returning the assigned id.
    ///
    /// Text fields are trimmed before storage.
    pub fn add_employee(&self, profile: &EmployeeProfile) -> ServiceResult<EmployeeId> {
        let profile = profile.normalized();
        profile.validate()?;

        let id = in_transaction(self.conn, |tx| {
            Ok(SqliteEmployeeRepository::new(tx).create_employee(&profile)?)
        })?;

        info!("event=employee_add module=service status=ok employee_id={id}");
        Ok(id)
    }

    /// Overwrites every mutable field of an existing employee.
    pub fn update_employee(&self, employee: &Employee) -> ServiceResult<()> {
        let employee = Employee {
            id: employee.id,
            profile: employee.profile.normalized(),
        };

        in_transaction(self.conn, |tx| {
            let repo = SqliteEmployeeRepository::new(tx);
            if !repo.employee_exists(employee.id)? {
                return Err(ServiceError::EmployeeNotFound(employee.id));
            }
            employee.profile.validate()?;
            repo.update_employee(&employee)?;
            Ok(())
        })?;

        info!(
            "event=employee_update module=service status=ok employee_id={}",
            employee.id
        );
        Ok(())
    }

    /// Deletes an employee together with every row that references it.
    pub fn remove_employee(&self, id: EmployeeId) -> ServiceResult<()> {
        let removed = in_transaction(self.conn, |tx| {
            let repo = SqliteEmployeeRepository::new(tx);
            if !repo.employee_exists(id)? {
                return Err(ServiceError::EmployeeNotFound(id));
            }
            let dependents = repo.dependent_counts(id)?;
            repo.delete_employee(id)?;
            Ok(dependents)
        })?;

        info!(
            "event=employee_remove module=service status=ok employee_id={} cascaded_payrolls={} cascaded_taxes={} cascaded_records={}",
            id, removed.payrolls, removed.taxes, removed.financial_records
        );
        Ok(())
    }
}
