//! Compensation policy: pay-rate and tax-bracket tables.
//!
//! # Responsibility
//! - Map positions to annual salaries for payroll generation.
//! - Apply the progressive tax bracket table to annual income.
//! - Load an operator-supplied policy from JSON.
//!
//! # Invariants
//! - Position lookup is case-insensitive and whitespace-trimmed.
//! - Brackets start at zero and their lower bounds strictly increase.
//! - Every money result is rounded to cents, midpoint away from zero.
//! - Salaries and bracket bounds are at most [`MAX_POLICY_AMOUNT`]; arithmetic
//!   on them is checked and reports overflow as `None`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Days used to prorate an annual amount over a pay period.
pub const DAYS_PER_YEAR: i64 = 365;

/// Largest salary or bracket bound a policy may configure.
pub const MAX_POLICY_AMOUNT: i64 = 1_000_000_000_000;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy file `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid policy JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid policy: {0}")]
    Invalid(String),
}

/// Rounds a money amount to cents.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Prorates an annual amount over `days` days, rounded to cents.
///
/// `None` when the intermediate product overflows.
pub fn prorate_annual(annual: Decimal, days: i64) -> Option<Decimal> {
    annual
        .checked_mul(Decimal::from(days))?
        .checked_div(Decimal::from(DAYS_PER_YEAR))
        .map(round_money)
}

fn check_policy_amount(what: &str, amount: Decimal) -> Result<(), PolicyError> {
    if amount.is_sign_negative() {
        return Err(PolicyError::Invalid(format!("{what} is negative: {amount}")));
    }
    if amount > Decimal::from(MAX_POLICY_AMOUNT) {
        return Err(PolicyError::Invalid(format!(
            "{what} exceeds {MAX_POLICY_AMOUNT}: {amount}"
        )));
    }
    Ok(())
}

/// Annual salary per position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRateTable {
    annual_salaries: BTreeMap<String, Decimal>,
    /// Applies to positions missing from the table. Unset means such
    /// positions cannot be paid.
    #[serde(default)]
    default_annual_salary: Option<Decimal>,
}

impl PayRateTable {
    pub fn new(
        entries: impl IntoIterator<Item = (String, Decimal)>,
        default_annual_salary: Option<Decimal>,
    ) -> Self {
        let annual_salaries = entries
            .into_iter()
            .map(|(position, salary)| (normalize_position(&position), salary))
            .collect();
        Self {
            annual_salaries,
            default_annual_salary,
        }
    }

    /// Looks up the annual salary for `position`.
    pub fn annual_salary(&self, position: &str) -> Option<Decimal> {
        self.annual_salaries
            .get(&normalize_position(position))
            .copied()
            .or(self.default_annual_salary)
    }

    fn validate(&self) -> Result<(), PolicyError> {
        for (position, salary) in &self.annual_salaries {
            check_policy_amount(&format!("annual salary for `{position}`"), *salary)?;
        }
        if let Some(salary) = self.default_annual_salary {
            check_policy_amount("default annual salary", salary)?;
        }
        Ok(())
    }
}

/// One band of the progressive table; it ends where the next band starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower: Decimal,
    /// Marginal rate as a fraction, e.g. `0.20`.
    pub rate: Decimal,
}

/// Progressive tax bracket table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxTable {
    brackets: Vec<TaxBracket>,
}

impl TaxTable {
    /// Tax owed on `income` for a full year. Zero or negative income owes zero.
    ///
    /// `None` when the computation overflows.
    pub fn annual_tax(&self, income: Decimal) -> Option<Decimal> {
        if income <= Decimal::ZERO {
            return Some(Decimal::ZERO);
        }

        let mut total = Decimal::ZERO;
        for (index, bracket) in self.brackets.iter().enumerate() {
            if income <= bracket.lower {
                break;
            }
            let upper = self
                .brackets
                .get(index + 1)
                .map_or(income, |next| next.lower.min(income));
            let band_tax = upper
                .checked_sub(bracket.lower)?
                .checked_mul(bracket.rate)?;
            total = total.checked_add(band_tax)?;
        }
        Some(round_money(total))
    }

    fn validate(&self) -> Result<(), PolicyError> {
        let first = self
            .brackets
            .first()
            .ok_or_else(|| PolicyError::Invalid("tax table has no brackets".to_string()))?;
        for bracket in &self.brackets {
            check_policy_amount("tax bracket bound", bracket.lower)?;
        }
        if !first.lower.is_zero() {
            return Err(PolicyError::Invalid(format!(
                "first tax bracket must start at 0, got {}",
                first.lower
            )));
        }
        for pair in self.brackets.windows(2) {
            if pair[1].lower <= pair[0].lower {
                return Err(PolicyError::Invalid(format!(
                    "tax bracket bounds must increase: {} then {}",
                    pair[0].lower, pair[1].lower
                )));
            }
        }
        if let Some(bracket) = self
            .brackets
            .iter()
            .find(|bracket| bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE)
        {
            return Err(PolicyError::Invalid(format!(
                "tax rate {} is outside [0, 1]",
                bracket.rate
            )));
        }
        Ok(())
    }
}

/// Pay rates plus tax brackets, shared by payroll and tax services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationPolicy {
    pub pay_rates: PayRateTable,
    pub tax_table: TaxTable,
}

impl CompensationPolicy {
    /// Built-in policy used when no policy file is configured.
    pub fn standard() -> Self {
        let pay_rates = PayRateTable::new(
            [
                ("intern", 24_000),
                ("clerk", 36_000),
                ("hr executive", 50_000),
                ("accountant", 55_000),
                ("analyst", 60_000),
                ("developer", 75_000),
                ("engineer", 75_000),
                ("manager", 90_000),
                ("senior engineer", 95_000),
                ("director", 130_000),
            ]
            .into_iter()
            .map(|(position, salary)| (position.to_string(), Decimal::from(salary))),
            None,
        );
        let tax_table = TaxTable {
            brackets: vec![
                TaxBracket {
                    lower: Decimal::ZERO,
                    rate: Decimal::ZERO,
                },
                TaxBracket {
                    lower: Decimal::from(10_000),
                    rate: Decimal::new(10, 2),
                },
                TaxBracket {
                    lower: Decimal::from(40_000),
                    rate: Decimal::new(20, 2),
                },
                TaxBracket {
                    lower: Decimal::from(90_000),
                    rate: Decimal::new(30, 2),
                },
            ],
        };
        Self {
            pay_rates,
            tax_table,
        }
    }

    /// Parses and validates a JSON policy document.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let parsed: Self = serde_json::from_str(json)?;
        let policy = Self {
            pay_rates: PayRateTable::new(
                parsed.pay_rates.annual_salaries,
                parsed.pay_rates.default_annual_salary,
            ),
            tax_table: parsed.tax_table,
        };
        policy.pay_rates.validate()?;
        policy.tax_table.validate()?;
        Ok(policy)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

impl Default for CompensationPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize_position(position: &str) -> String {
    position.trim().to_lowercase()
}
