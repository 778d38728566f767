//! Employee repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing is ordered by `id ASC`.
//! - Write paths validate the profile before SQL mutations.
//! - Deleting an employee cascades to payroll, tax and ledger rows.

use super::{EntityRef, RepoError, RepoResult};
use crate::model::employee::{Employee, EmployeeId, EmployeeProfile};
use rusqlite::{params, Connection, OptionalExtension, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    dob,
    gender,
    email,
    phone,
    address,
    position,
    joining_date,
    termination_date
FROM employee";

/// Rows owned by an employee that removal deletes along with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DependentCounts {
    pub payrolls: i64,
    pub taxes: i64,
    pub financial_records: i64,
}

/// Repository interface for employee CRUD.
pub trait EmployeeRepository {
    /// Inserts a validated profile and returns the store-assigned id.
    fn create_employee(&self, profile: &EmployeeProfile) -> RepoResult<EmployeeId>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    /// Overwrites every mutable field. `NotFound` when no row matches.
    fn update_employee(&self, employee: &Employee) -> RepoResult<()>;
    /// Deletes the row and, through foreign keys, its dependents.
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
    fn employee_exists(&self, id: EmployeeId) -> RepoResult<bool>;
    fn dependent_counts(&self, id: EmployeeId) -> RepoResult<DependentCounts>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, profile: &EmployeeProfile) -> RepoResult<EmployeeId> {
        profile.validate()?;

        self.conn.execute(
            "INSERT INTO employee (
                first_name,
                last_name,
                dob,
                gender,
                email,
                phone,
                address,
                position,
                joining_date,
                termination_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                profile.first_name.as_str(),
                profile.last_name.as_str(),
                profile.date_of_birth,
                profile.gender.as_str(),
                profile.email.as_str(),
                profile.phone_number.as_str(),
                profile.address.as_str(),
                profile.position.as_str(),
                profile.joining_date,
                profile.termination_date,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let employee = self
            .conn
            .query_row(
                &format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_employee_row,
            )
            .optional()?;
        Ok(employee)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let employees = stmt
            .query_map([], parse_employee_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(employees)
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<()> {
        let profile = &employee.profile;
        profile.validate()?;

        let changed = self.conn.execute(
            "UPDATE employee
             SET
                first_name = ?1,
                last_name = ?2,
                dob = ?3,
                gender = ?4,
                email = ?5,
                phone = ?6,
                address = ?7,
                position = ?8,
                joining_date = ?9,
                termination_date = ?10
             WHERE id = ?11;",
            params![
                profile.first_name.as_str(),
                profile.last_name.as_str(),
                profile.date_of_birth,
                profile.gender.as_str(),
                profile.email.as_str(),
                profile.phone_number.as_str(),
                profile.address.as_str(),
                profile.position.as_str(),
                profile.joining_date,
                profile.termination_date,
                employee.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Employee(employee.id)));
        }

        Ok(())
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employee WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Employee(id)));
        }

        Ok(())
    }

    fn employee_exists(&self, id: EmployeeId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM employee WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn dependent_counts(&self, id: EmployeeId) -> RepoResult<DependentCounts> {
        let counts = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM payroll WHERE employee_id = ?1),
                (SELECT COUNT(*) FROM tax WHERE employee_id = ?1),
                (SELECT COUNT(*) FROM financial_record WHERE employee_id = ?1);",
            [id],
            |row| {
                Ok(DependentCounts {
                    payrolls: row.get(0)?,
                    taxes: row.get(1)?,
                    financial_records: row.get(2)?,
                })
            },
        )?;
        Ok(counts)
    }
}

fn parse_employee_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        profile: EmployeeProfile {
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            date_of_birth: row.get("dob")?,
            gender: row.get("gender")?,
            email: row.get("email")?,
            phone_number: row.get("phone")?,
            address: row.get("address")?,
            position: row.get("position")?,
            joining_date: row.get("joining_date")?,
            termination_date: row.get("termination_date")?,
        },
    })
}
