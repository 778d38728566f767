//! Employee domain model.
//!
//! # Responsibility
//! - Define the employee record and its mutable profile.
//! - Validate profile fields before persistence.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - `termination_date`, when set, is not earlier than `joining_date`.
//! - `date_of_birth` is earlier than `joining_date`.

use super::validation::{require_non_empty, validate_date_range, ValidationError};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").expect("valid phone regex"));

/// Store-assigned employee identifier.
pub type EmployeeId = i64;

/// Every mutable employee field.
///
/// Kept separate from [`Employee`] so a freshly entered profile can be compared
/// with what the store returns, identifier aside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    /// Job title; drives the pay-rate lookup.
    pub position: String,
    pub joining_date: NaiveDate,
    pub termination_date: Option<NaiveDate>,
}

impl EmployeeProfile {
    /// Validates required fields, contact formats and date ordering.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("first name", &self.first_name)?;
        require_non_empty("last name", &self.last_name)?;
        require_non_empty("gender", &self.gender)?;
        require_non_empty("email", &self.email)?;
        require_non_empty("phone number", &self.phone_number)?;
        require_non_empty("address", &self.address)?;
        require_non_empty("position", &self.position)?;

        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }
        if !PHONE_RE.is_match(self.phone_number.trim()) {
            return Err(ValidationError::InvalidPhone(self.phone_number.clone()));
        }

        validate_date_range("date of birth", self.date_of_birth)?;
        validate_date_range("joining date", self.joining_date)?;
        if let Some(termination_date) = self.termination_date {
            validate_date_range("termination date", termination_date)?;
        }

        if self.date_of_birth >= self.joining_date {
            return Err(ValidationError::DateOrder {
                earlier: "date of birth",
                earlier_value: self.date_of_birth,
                later: "joining date",
                later_value: self.joining_date,
            });
        }
        if let Some(termination_date) = self.termination_date {
            if termination_date < self.joining_date {
                return Err(ValidationError::DateOrder {
                    earlier: "joining date",
                    earlier_value: self.joining_date,
                    later: "termination date",
                    later_value: termination_date,
                });
            }
        }

        Ok(())
    }

    /// Returns a copy with surrounding whitespace removed from text fields.
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            gender: self.gender.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            address: self.address.trim().to_string(),
            position: self.position.trim().to_string(),
            ..self.clone()
        }
    }
}

/// Employee record as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(flatten)]
    pub profile: EmployeeProfile,
}

impl Employee {
    /// Age in completed years on `date`; `None` before the date of birth.
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        let birth = self.profile.date_of_birth;
        if date < birth {
            return None;
        }
        let mut years = date.year() - birth.year();
        if (date.month(), date.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    /// Whether `date` falls inside `[joining_date, termination_date]`.
    pub fn is_employed_on(&self, date: NaiveDate) -> bool {
        date >= self.profile.joining_date
            && self
                .profile
                .termination_date
                .map_or(true, |termination| date <= termination)
    }

    /// Intersection of `[start, end]` with the employment window.
    ///
    /// Returns `None` when the employee did not work any day of the range.
    pub fn employment_overlap(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Option<(NaiveDate, NaiveDate)> {
        let from = start.max(self.profile.joining_date);
        let to = match self.profile.termination_date {
            Some(termination) => end.min(termination),
            None => end,
        };
        (from <= to).then_some((from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn profile() -> EmployeeProfile {
        EmployeeProfile {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            date_of_birth: date(1990, 6, 15),
            gender: "F".to_string(),
            email: "asha.rao@example.com".to_string(),
            phone_number: "+91 98765-43210".to_string(),
            address: "12 Lake Road".to_string(),
            position: "Engineer".to_string(),
            joining_date: date(2020, 1, 1),
            termination_date: None,
        }
    }

    #[test]
    fn valid_profile_passes() {
        profile().validate().unwrap();
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut input = profile();
        input.position = "   ".to_string();
        assert_eq!(
            input.validate().unwrap_err(),
            ValidationError::EmptyField("position")
        );
    }

    #[test]
    fn malformed_contact_fields_are_rejected() {
        let mut input = profile();
        input.email = "asha.example.com".to_string();
        assert!(matches!(
            input.validate().unwrap_err(),
            ValidationError::InvalidEmail(_)
        ));

        let mut input = profile();
        input.phone_number = "call me".to_string();
        assert!(matches!(
            input.validate().unwrap_err(),
            ValidationError::InvalidPhone(_)
        ));
    }

    #[test]
    fn termination_before_joining_is_rejected() {
        let mut input = profile();
        input.termination_date = Some(date(2019, 12, 31));
        assert!(matches!(
            input.validate().unwrap_err(),
            ValidationError::DateOrder {
                later: "termination date",
                ..
            }
        ));

        input.termination_date = Some(date(2020, 1, 1));
        input.validate().unwrap();
    }

    #[test]
    fn dates_beyond_four_digit_years_are_rejected() {
        let mut input = profile();
        input.termination_date = Some(date(10_000, 1, 31));
        assert_eq!(
            input.validate().unwrap_err(),
            ValidationError::DateOutOfRange {
                field: "termination date",
                value: date(10_000, 1, 31),
            }
        );

        let mut input = profile();
        input.date_of_birth = date(-1, 5, 1);
        assert!(matches!(
            input.validate().unwrap_err(),
            ValidationError::DateOutOfRange {
                field: "date of birth",
                ..
            }
        ));
    }

    #[test]
    fn age_counts_completed_years() {
        let employee = Employee {
            id: 1,
            profile: profile(),
        };
        assert_eq!(employee.age_on(date(2024, 6, 14)), Some(33));
        assert_eq!(employee.age_on(date(2024, 6, 15)), Some(34));
        assert_eq!(employee.age_on(date(1980, 1, 1)), None);
    }

    #[test]
    fn employment_overlap_clips_to_window() {
        let mut input = profile();
        input.termination_date = Some(date(2024, 1, 20));
        let employee = Employee {
            id: 1,
            profile: input,
        };

        assert_eq!(
            employee.employment_overlap(date(2024, 1, 1), date(2024, 1, 31)),
            Some((date(2024, 1, 1), date(2024, 1, 20)))
        );
        assert_eq!(
            employee.employment_overlap(date(2024, 2, 1), date(2024, 2, 29)),
            None
        );
        assert!(employee.is_employed_on(date(2024, 1, 20)));
        assert!(!employee.is_employed_on(date(2024, 1, 21)));
    }
}
