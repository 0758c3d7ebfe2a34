//! Academic-year range form ("2024" to "2028" creates the course's years).

use chrono::{Datelike, Utc};
use serde::Serialize;
use validator::{Validate, ValidationError};

use super::{first_violation, EntityForm};
use crate::error::CoreError;
use crate::types::DbId;

/// How far in the past the starting year may lie.
pub const MAX_YEARS_IN_PAST: i32 = 5;

const FIELD_ORDER: &[&str] = &["from_year", "to_year"];

/// Strip non-digits and cap the input at four characters, as applied to each
/// keystroke.
pub fn sanitize_year_input(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).take(4).collect()
}

fn four_digit_year(value: &str) -> Result<(), ValidationError> {
    if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("four_digit_year"))
    }
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct AcademicYearForm {
    pub course_id: DbId,
    #[validate(custom(function = "four_digit_year", message = "From year must be a 4-digit year"))]
    pub from_year: String,
    #[validate(custom(function = "four_digit_year", message = "To year must be a 4-digit year"))]
    pub to_year: String,
}

impl AcademicYearForm {
    pub fn for_course(course_id: DbId) -> Self {
        Self {
            course_id,
            from_year: String::new(),
            to_year: String::new(),
        }
    }

    /// Keystroke handler for the "from" field.
    pub fn set_from_year(&mut self, input: &str) {
        self.from_year = sanitize_year_input(input);
    }

    pub fn set_to_year(&mut self, input: &str) {
        self.to_year = sanitize_year_input(input);
    }

    /// Validate against an explicit current year.
    pub fn payload_at(&self, current_year: i32) -> Result<AcademicYearPayload, CoreError> {
        self.validate()
            .map_err(|errors| first_violation(&errors, FIELD_ORDER))?;

        let parse = |s: &str| {
            s.parse::<i32>()
                .map_err(|_| CoreError::Validation(format!("Invalid year: {s}")))
        };
        let from_year = parse(&self.from_year)?;
        let to_year = parse(&self.to_year)?;

        if from_year >= to_year {
            return Err(CoreError::Validation(
                "From year must be less than to year".into(),
            ));
        }
        if from_year < current_year - MAX_YEARS_IN_PAST {
            return Err(CoreError::Validation(format!(
                "From year cannot be more than {MAX_YEARS_IN_PAST} years in the past"
            )));
        }

        Ok(AcademicYearPayload { from_year, to_year })
    }
}

/// Body of `POST /courses/{id}/academic-years`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYearPayload {
    pub from_year: i32,
    pub to_year: i32,
}

impl EntityForm for AcademicYearForm {
    type Payload = AcademicYearPayload;

    fn to_payload(&self) -> Result<AcademicYearPayload, CoreError> {
        self.payload_at(Utc::now().year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(from: &str, to: &str) -> AcademicYearForm {
        AcademicYearForm {
            course_id: 1,
            from_year: from.into(),
            to_year: to.into(),
        }
    }

    #[test]
    fn accepts_valid_range() {
        assert_eq!(
            form("2024", "2028").payload_at(2025),
            Ok(AcademicYearPayload {
                from_year: 2024,
                to_year: 2028
            })
        );
    }

    #[test]
    fn rejects_reversed_range() {
        assert_eq!(
            form("2028", "2024").payload_at(2025),
            Err(CoreError::Validation(
                "From year must be less than to year".into()
            ))
        );
        assert!(form("2024", "2024").payload_at(2025).is_err());
    }

    #[test]
    fn rejects_non_digit_years() {
        assert_eq!(
            form("abcd", "2028").payload_at(2025),
            Err(CoreError::Validation("From year must be a 4-digit year".into()))
        );
        assert_eq!(
            form("2024", "28").payload_at(2025),
            Err(CoreError::Validation("To year must be a 4-digit year".into()))
        );
    }

    #[test]
    fn rejects_distant_past() {
        assert_eq!(
            form("2019", "2023").payload_at(2025),
            Err(CoreError::Validation(
                "From year cannot be more than 5 years in the past".into()
            ))
        );
        assert!(form("2020", "2023").payload_at(2025).is_ok());
    }

    #[test]
    fn sanitizes_keystrokes() {
        assert_eq!(sanitize_year_input("20a2-4x9"), "2024");
        assert_eq!(sanitize_year_input("abcd"), "");

        let mut f = AcademicYearForm::for_course(1);
        f.set_from_year("2O24");
        assert_eq!(f.from_year, "224");
        f.set_to_year("2028 ");
        assert_eq!(f.to_year, "2028");
    }
}
