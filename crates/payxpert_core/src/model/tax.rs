//! Tax domain model.

use super::employee::EmployeeId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store-assigned tax identifier.
pub type TaxId = i64;

/// Computed tax for one (employee, year) pair.
///
/// The pair is the logical key: recalculation overwrites `taxable_income` and
/// `amount` in place and keeps `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    pub id: TaxId,
    pub employee_id: EmployeeId,
    pub tax_year: i32,
    pub taxable_income: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTax {
    pub employee_id: EmployeeId,
    pub tax_year: i32,
    pub taxable_income: Decimal,
    pub amount: Decimal,
}
