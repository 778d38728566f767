//! Tax repository contract and SQLite implementation.
//!
//! # Invariants
//! - At most one row per `(employee_id, tax_year)`; writes upsert on that key.
//! - Upserts keep the original row id.

use super::{decimal_column, decimal_to_db, RepoResult};
use crate::model::employee::EmployeeId;
use crate::model::tax::{NewTax, Tax, TaxId};
use crate::model::validation::validate_tax_year;
use rusqlite::{params, Connection, Params, Row};

const TAX_SELECT_SQL: &str = "SELECT
    id,
    employee_id,
    tax_year,
    taxable_income,
    amount
FROM tax";

pub trait TaxRepository {
    /// Inserts or overwrites the entry for `(employee_id, tax_year)`.
    fn upsert_tax(&self, tax: &NewTax) -> RepoResult<Tax>;
    fn get_tax(&self, id: TaxId) -> RepoResult<Option<Tax>>;
    /// Entries for one employee, ordered by `tax_year ASC`.
    fn list_for_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<Tax>>;
    /// Entries for one year, ordered by `employee_id ASC`.
    fn list_for_year(&self, tax_year: i32) -> RepoResult<Vec<Tax>>;
}

/// SQLite-backed tax repository.
pub struct SqliteTaxRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaxRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_taxes(&self, sql: &str, bind: impl Params) -> RepoResult<Vec<Tax>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut taxes = Vec::new();
        while let Some(row) = rows.next()? {
            taxes.push(parse_tax_row(row)?);
        }
        Ok(taxes)
    }
}

impl TaxRepository for SqliteTaxRepository<'_> {
    fn upsert_tax(&self, tax: &NewTax) -> RepoResult<Tax> {
        validate_tax_year(tax.tax_year)?;

        let id: TaxId = self.conn.query_row(
            "INSERT INTO tax (employee_id, tax_year, taxable_income, amount)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (employee_id, tax_year) DO UPDATE SET
                taxable_income = excluded.taxable_income,
                amount = excluded.amount
             RETURNING id;",
            params![
                tax.employee_id,
                tax.tax_year,
                decimal_to_db(tax.taxable_income),
                decimal_to_db(tax.amount),
            ],
            |row| row.get(0),
        )?;

        Ok(Tax {
            id,
            employee_id: tax.employee_id,
            tax_year: tax.tax_year,
            taxable_income: tax.taxable_income,
            amount: tax.amount,
        })
    }

    fn get_tax(&self, id: TaxId) -> RepoResult<Option<Tax>> {
        let mut taxes = self.query_taxes(&format!("{TAX_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(taxes.pop())
    }

    fn list_for_employee(&self, employee_id: EmployeeId) -> RepoResult<Vec<Tax>> {
        self.query_taxes(
            &format!("{TAX_SELECT_SQL} WHERE employee_id = ?1 ORDER BY tax_year ASC, id ASC;"),
            [employee_id],
        )
    }

    fn list_for_year(&self, tax_year: i32) -> RepoResult<Vec<Tax>> {
        self.query_taxes(
            &format!("{TAX_SELECT_SQL} WHERE tax_year = ?1 ORDER BY employee_id ASC, id ASC;"),
            [tax_year],
        )
    }
}

fn parse_tax_row(row: &Row<'_>) -> RepoResult<Tax> {
    Ok(Tax {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        tax_year: row.get("tax_year")?,
        taxable_income: decimal_column(row, "tax", "taxable_income")?,
        amount: decimal_column(row, "tax", "amount")?,
    })
}
