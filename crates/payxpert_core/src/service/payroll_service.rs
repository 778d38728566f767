//! Payroll use-case service.
//!
//! # Responsibility
//! - Generate payroll entries from employee position and period length.
//! - Provide payroll lookups by id, employee and period.
//!
//! # Invariants
//! - A reversed period fails with `InvalidInput` before anything is read or
//!   written.
//! - Paid days are the inclusive days of the period inside the employment
//!   window; `start == end` pays one day.
//! - `net = gross - deductions`, where deductions prorate the annual tax on
//!   the position's salary.

use super::{in_transaction, ServiceError, ServiceResult};
use crate::model::employee::{Employee, EmployeeId};
use crate::model::payroll::{NewPayroll, Payroll, PayrollId};
use crate::model::validation::validate_period;
use crate::policy::{prorate_annual, CompensationPolicy};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::payroll_repo::{PayrollRepository, SqlitePayrollRepository};
use chrono::NaiveDate;
use log::{info, warn};
use rusqlite::Connection;

pub struct PayrollService<'a> {
    conn: &'a Connection,
    policy: &'a CompensationPolicy,
}

impl<'a> PayrollService<'a> {
    pub fn new(conn: &'a Connection, policy: &'a CompensationPolicy) -> Self {
        Self { conn, policy }
    }

    /// Computes and stores the payroll for `employee_id` over
    /// `[period_start, period_end]`.
    ///
    /// # Errors
    /// - `InvalidInput` when `period_start > period_end`.
    /// - `EmployeeNotFound` when the employee does not exist.
    /// - `PayrollGeneration` when the position has no pay rate or the
    ///   employee was not employed on any day of the period.
    pub fn generate_payroll(
        &self,
        employee_id: EmployeeId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> ServiceResult<Payroll> {
        validate_period(period_start, period_end)?;

        let payroll = in_transaction(self.conn, |tx| {
            let employee = SqliteEmployeeRepository::new(tx)
                .get_employee(employee_id)?
                .ok_or(ServiceError::EmployeeNotFound(employee_id))?;
            let computed = self.compute(&employee, period_start, period_end)?;
            Ok(SqlitePayrollRepository::new(tx).create_payroll(&computed)?)
        })
        .inspect_err(|err| {
            warn!(
                "event=payroll_generate module=service status=error employee_id={} error={}",
                employee_id, err
            );
        })?;

        info!(
            "event=payroll_generate module=service status=ok employee_id={} payroll_id={}",
            employee_id, payroll.id
        );
        Ok(payroll)
    }

    pub fn get_payroll_by_id(&self, id: PayrollId) -> ServiceResult<Payroll> {
        SqlitePayrollRepository::new(self.conn)
            .get_payroll(id)?
            .ok_or(ServiceError::PayrollNotFound(id))
    }

    /// Payrolls for an existing employee, ordered by period start.
    pub fn get_payrolls_for_employee(&self, employee_id: EmployeeId) -> ServiceResult<Vec<Payroll>> {
        if !SqliteEmployeeRepository::new(self.conn).employee_exists(employee_id)? {
            return Err(ServiceError::EmployeeNotFound(employee_id));
        }
        Ok(SqlitePayrollRepository::new(self.conn).list_for_employee(employee_id)?)
    }

    /// Payrolls whose period intersects `[start, end]`, bounds inclusive.
    pub fn get_payrolls_for_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<Vec<Payroll>> {
        validate_period(start, end)?;
        Ok(SqlitePayrollRepository::new(self.conn).list_overlapping(start, end)?)
    }

    fn compute(
        &self,
        employee: &Employee,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> ServiceResult<NewPayroll> {
        let position = employee.profile.position.as_str();
        let annual_salary = self
            .policy
            .pay_rates
            .annual_salary(position)
            .ok_or_else(|| {
                ServiceError::PayrollGeneration(format!(
                    "no pay rate configured for position `{position}`"
                ))
            })?;

        let (paid_from, paid_to) = employee
            .employment_overlap(period_start, period_end)
            .ok_or_else(|| {
                ServiceError::PayrollGeneration(format!(
                    "employee {} was not employed between {period_start} and {period_end}",
                    employee.id
                ))
            })?;
        let paid_days = (paid_to - paid_from).num_days() + 1;

        let overflow = || {
            ServiceError::PayrollGeneration(format!(
                "pay for position `{position}` over {paid_days} days is out of range"
            ))
        };
        let gross_amount = prorate_annual(annual_salary, paid_days).ok_or_else(overflow)?;
        let deductions = self
            .policy
            .tax_table
            .annual_tax(annual_salary)
            .and_then(|annual_tax| prorate_annual(annual_tax, paid_days))
            .ok_or_else(overflow)?;

        Ok(NewPayroll {
            employee_id: employee.id,
            period_start,
            period_end,
            gross_amount,
            deductions,
            net_amount: gross_amount - deductions,
        })
    }
}
