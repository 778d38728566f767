//! Payroll repository contract and SQLite implementation.
//!
//! # Invariants
//! - Payroll rows are insert-only.
//! - Per-employee and per-period listings are ordered by
//!   `period_start ASC, id ASC`.
//! - Period queries use closed-interval overlap semantics.

use super::{decimal_column, decimal_to_db, RepoError, RepoResult};
use crate::model::employee::EmployeeId;
use crate::model::payroll::{NewPayroll, Payroll, PayrollId};
use crate::model::validation::validate_period;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Params, Row};
use rust_decimal::Decimal;

const PAYROLL_SELECT_SQL: &str = "SELECT
    id,
    employee_id,
    period_start,
    period_end,
    gross_amount,
    deductions,
    net_amount
FROM payroll";

/// Repository interface for payroll persistence and queries.
pub trait PayrollRepository {
    fn create_payroll(&self, payroll: &NewPayroll) -> RepoResult<Payroll>;
    fn get_payroll(&self, id: PayrollId) -> RepoResult<Option<Payroll>>;
    fn list_for_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<Payroll>>;
    /// Payrolls whose `[period_start, period_end]` intersects `[start, end]`.
    fn list_overlapping(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<Vec<Payroll>>;
    /// Gross amounts of the payrolls whose period ends in `year`.
    fn gross_amounts_for_year(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> RepoResult<Vec<Decimal>>;
}

/// SQLite-backed payroll repository.
pub struct SqlitePayrollRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePayrollRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_payrolls(
        &self,
        sql: &str,
        bind: impl Params,
    ) -> RepoResult<Vec<Payroll>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut payrolls = Vec::new();
        while let Some(row) = rows.next()? {
            payrolls.push(parse_payroll_row(row)?);
        }
        Ok(payrolls)
    }
}

impl PayrollRepository for SqlitePayrollRepository<'_> {
    fn create_payroll(&self, payroll: &NewPayroll) -> RepoResult<Payroll> {
        validate_period(payroll.period_start, payroll.period_end)?;

        self.conn.execute(
            "INSERT INTO payroll (
                employee_id,
                period_start,
                period_end,
                gross_amount,
                deductions,
                net_amount
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                payroll.employee_id,
                payroll.period_start,
                payroll.period_end,
                decimal_to_db(payroll.gross_amount),
                decimal_to_db(payroll.deductions),
                decimal_to_db(payroll.net_amount),
            ],
        )?;

        Ok(Payroll {
            id: self.conn.last_insert_rowid(),
            employee_id: payroll.employee_id,
            period_start: payroll.period_start,
            period_end: payroll.period_end,
            gross_amount: payroll.gross_amount,
            deductions: payroll.deductions,
            net_amount: payroll.net_amount,
        })
    }

    fn get_payroll(&self, id: PayrollId) -> RepoResult<Option<Payroll>> {
        let mut payrolls =
            self.query_payrolls(&format!("{PAYROLL_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(payrolls.pop())
    }

    fn list_for_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<Payroll>> {
        self.query_payrolls(
            &format!(
                "{PAYROLL_SELECT_SQL}
                 WHERE employee_id = ?1
                 ORDER BY period_start ASC, id ASC;"
            ),
            [employee_id],
        )
    }

    fn list_overlapping(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<Vec<Payroll>> {
        self.query_payrolls(
            &format!(
                "{PAYROLL_SELECT_SQL}
                 WHERE period_start <= ?2
                   AND period_end >= ?1
                 ORDER BY period_start ASC, id ASC;"
            ),
            params![start, end],
        )
    }

    fn gross_amounts_for_year(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> RepoResult<Vec<Decimal>> {
        let mut stmt = self.conn.prepare(
            "SELECT gross_amount
             FROM payroll
             WHERE employee_id = ?1
               AND substr(period_end, 1, 4) = ?2;",
        )?;
        let mut rows = stmt.query(params![employee_id, format!("{year:04}")])?;
        let mut amounts = Vec::new();
        while let Some(row) = rows.next()? {
            amounts.push(decimal_column(row, "payroll", "gross_amount")?);
        }
        Ok(amounts)
    }
}

fn parse_payroll_row(row: &Row<'_>) -> RepoResult<Payroll> {
    let payroll = Payroll {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        period_start: row.get("period_start")?,
        period_end: row.get("period_end")?,
        gross_amount: decimal_column(row, "payroll", "gross_amount")?,
        deductions: decimal_column(row, "payroll", "deductions")?,
        net_amount: decimal_column(row, "payroll", "net_amount")?,
    };
    if payroll.period_start > payroll.period_end {
        return Err(RepoError::InvalidData(format!(
            "payroll {} has period_start after period_end",
            payroll.id
        )));
    }
    Ok(payroll)
}

