//! Tax use-case service.
//!
//! # Invariants
//! - Taxable income for a year is the sum of gross amounts of the employee's
//!   payrolls whose period ends in that year.
//! - No recorded earnings yields a zero-tax entry, not an error.
//! - Recalculation overwrites the `(employee, year)` entry in place.

use super::{in_transaction, ServiceError, ServiceResult};
use crate::model::employee::EmployeeId;
use crate::model::tax::{NewTax, Tax, TaxId};
use crate::model::validation::validate_tax_year;
use crate::policy::CompensationPolicy;
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::payroll_repo::{PayrollRepository, SqlitePayrollRepository};
use crate::repo::tax_repo::{SqliteTaxRepository, TaxRepository};
use log::info;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub struct TaxService<'a> {
    conn: &'a Connection,
    policy: &'a CompensationPolicy,
}

impl<'a> TaxService<'a> {
    pub fn new(conn: &'a Connection, policy: &'a CompensationPolicy) -> Self {
        Self { conn, policy }
    }

    /// Computes, stores and returns the tax entry for `(employee_id, year)`.
    pub fn calculate_tax(&self, employee_id: EmployeeId, year: i32) -> ServiceResult<Tax> {
        validate_tax_year(year)?;

        let tax = in_transaction(self.conn, |tx| {
            if !SqliteEmployeeRepository::new(tx).employee_exists(employee_id)? {
                return Err(ServiceError::EmployeeNotFound(employee_id));
            }

            let overflow = || {
                ServiceError::TaxCalculation(format!(
                    "taxable income for employee {employee_id} in {year} is out of range"
                ))
            };
            let taxable_income = SqlitePayrollRepository::new(tx)
                .gross_amounts_for_year(employee_id, year)?
                .into_iter()
                .try_fold(Decimal::ZERO, Decimal::checked_add)
                .ok_or_else(overflow)?;
            if taxable_income.is_sign_negative() {
                return Err(ServiceError::TaxCalculation(format!(
                    "negative taxable income {taxable_income} for employee {employee_id} in {year}"
                )));
            }
            let amount = self
                .policy
                .tax_table
                .annual_tax(taxable_income)
                .ok_or_else(overflow)?;

            Ok(SqliteTaxRepository::new(tx).upsert_tax(&NewTax {
                employee_id,
                tax_year: year,
                taxable_income,
                amount,
            })?)
        })?;

        info!(
            "event=tax_calculate module=service status=ok employee_id={} tax_year={} tax_id={}",
            employee_id, year, tax.id
        );
        Ok(tax)
    }

    pub fn get_tax_by_id(&self, id: TaxId) -> ServiceResult<Tax> {
        SqliteTaxRepository::new(self.conn)
            .get_tax(id)?
            .ok_or(ServiceError::TaxNotFound(id))
    }

    /// Entries for an existing employee, ordered by year.
    pub fn get_taxes_for_employee(&self, employee_id: EmployeeId) -> ServiceResult<Vec<Tax>> {
        if !SqliteEmployeeRepository::new(self.conn).employee_exists(employee_id)? {
            return Err(ServiceError::EmployeeNotFound(employee_id));
        }
        Ok(SqliteTaxRepository::new(self.conn).list_for_employee(employee_id)?)
    }

    /// Entries for `year`, ordered by employee id.
    pub fn get_taxes_for_year(&self, year: i32) -> ServiceResult<Vec<Tax>> {
        validate_tax_year(year)?;
        Ok(SqliteTaxRepository::new(self.conn).list_for_year(year)?)
    }
}
