//! Section create/edit form.
//!
//! The academic session is not user-editable: it defaults to the session
//! starting in the current calendar year and is always sent as computed.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use validator::Validate;

use super::{first_violation, not_blank, EntityForm};
use crate::error::CoreError;
use crate::models::{AcademicYear, Course, Section, SectionStatus};
use crate::types::DbId;

pub const MAX_SECTION_STUDENTS: u32 = 100;
const DEFAULT_MAX_STUDENTS: u32 = 60;

const FIELD_ORDER: &[&str] = &[
    "name",
    "course_id",
    "academic_year_id",
    "department_id",
    "max_students",
];

/// `"2024-25"` for any date in 2024.
pub fn default_academic_session(today: NaiveDate) -> String {
    let year = today.year();
    format!("{year}-{:02}", (year + 1).rem_euclid(100))
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SectionForm {
    /// Set when editing an existing section.
    pub section_id: Option<DbId>,
    #[validate(custom(function = "not_blank", message = "Section name is required"))]
    pub name: String,
    #[validate(required(message = "Course is required"))]
    pub course_id: Option<DbId>,
    #[validate(required(message = "Academic year is required"))]
    pub academic_year_id: Option<DbId>,
    #[validate(required(message = "Department is required"))]
    pub department_id: Option<DbId>,
    #[validate(range(min = 1, max = 100, message = "Max students must be between 1 and 100"))]
    pub max_students: u32,
    pub status: SectionStatus,
    pub academic_session: String,
}

impl SectionForm {
    /// New section under `year`, inheriting the course's department.
    pub fn for_course(course: &Course, year: &AcademicYear, today: NaiveDate) -> Self {
        Self {
            section_id: None,
            name: String::new(),
            course_id: Some(course.id),
            academic_year_id: Some(year.id),
            department_id: course.department_id,
            max_students: DEFAULT_MAX_STUDENTS,
            status: SectionStatus::Active,
            academic_session: default_academic_session(today),
        }
    }

    pub fn edit(section: &Section) -> Self {
        Self {
            section_id: Some(section.id),
            name: section.name.clone(),
            course_id: Some(section.course_id),
            academic_year_id: Some(section.academic_year_id),
            department_id: section.department_id,
            max_students: section.max_students,
            status: section.status,
            academic_session: section.academic_session.clone().unwrap_or_default(),
        }
    }
}

/// Body of `POST /sections` and `PUT /sections/{id}`. The backend expects
/// snake_case for the department, capacity and session fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPayload {
    pub name: String,
    #[serde(rename = "courseId")]
    pub course_id: DbId,
    #[serde(rename = "academicYearId")]
    pub academic_year_id: DbId,
    pub department_id: DbId,
    pub max_students: u32,
    pub academic_session: String,
    pub status: SectionStatus,
}

impl EntityForm for SectionForm {
    type Payload = SectionPayload;

    fn to_payload(&self) -> Result<SectionPayload, CoreError> {
        self.validate()
            .map_err(|errors| first_violation(&errors, FIELD_ORDER))?;

        let (Some(course_id), Some(academic_year_id), Some(department_id)) =
            (self.course_id, self.academic_year_id, self.department_id)
        else {
            return Err(CoreError::Validation(
                "Course, academic year and department are required".into(),
            ));
        };

        Ok(SectionPayload {
            name: self.name.trim().to_string(),
            course_id,
            academic_year_id,
            department_id,
            max_students: self.max_students,
            academic_session: self.academic_session.clone(),
            status: self.status,
        })
    }
}
