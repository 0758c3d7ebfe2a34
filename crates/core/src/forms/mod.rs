//! Create/update forms for courses, sections and academic years.
//!
//! Each form validates itself into a request payload. [`Modal`] drives the
//! open → submitting → closed / error lifecycle around a form and keeps the
//! user's input intact when validation or the request fails.

pub mod academic_year;
pub mod course;
pub mod section;

use chrono::NaiveDate;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::models::Course;
use crate::structure::{AcademicStructure, NodeAction};
use crate::types::DbId;

pub use academic_year::{sanitize_year_input, AcademicYearForm, AcademicYearPayload};
pub use course::{CourseForm, CoursePayload};
pub use section::{default_academic_session, SectionForm, SectionPayload, MAX_SECTION_STUDENTS};

/// A form that can be turned into a request payload.
pub trait EntityForm {
    type Payload: Serialize;

    /// Validate the current input and build the payload.
    fn to_payload(&self) -> Result<Self::Payload, CoreError>;
}

/// Lifecycle of a form modal.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalState<F> {
    Closed,
    Open(F),
    Submitting(F),
    Error { form: F, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modal<F> {
    state: ModalState<F>,
}

impl<F> Default for Modal<F> {
    fn default() -> Self {
        Self {
            state: ModalState::Closed,
        }
    }
}

impl<F: EntityForm> Modal<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ModalState<F> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, ModalState::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, ModalState::Submitting(_))
    }

    /// The form being edited, if the modal is open or showing an error.
    pub fn form(&self) -> Option<&F> {
        match &self.state {
            ModalState::Open(form)
            | ModalState::Submitting(form)
            | ModalState::Error { form, .. } => Some(form),
            ModalState::Closed => None,
        }
    }

    /// Mutable access for editing. Not available while a request is in
    /// flight.
    pub fn form_mut(&mut self) -> Option<&mut F> {
        match &mut self.state {
            ModalState::Open(form) | ModalState::Error { form, .. } => Some(form),
            ModalState::Closed | ModalState::Submitting(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ModalState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn open(&mut self, form: F) -> Result<(), CoreError> {
        if self.is_submitting() {
            return Err(CoreError::Conflict(
                "Cannot reopen a form while it is being submitted".into(),
            ));
        }
        self.state = ModalState::Open(form);
        Ok(())
    }

    /// Validate and move to `Submitting`, returning the payload to send.
    ///
    /// On validation failure the modal moves to `Error` with the form kept,
    /// and no payload is produced.
    pub fn begin_submit(&mut self) -> Result<F::Payload, CoreError> {
        let form = match std::mem::replace(&mut self.state, ModalState::Closed) {
            ModalState::Open(form) | ModalState::Error { form, .. } => form,
            other => {
                self.state = other;
                return Err(CoreError::Conflict("Form is not open for submission".into()));
            }
        };

        match form.to_payload() {
            Ok(payload) => {
                self.state = ModalState::Submitting(form);
                Ok(payload)
            }
            Err(err) => {
                self.state = ModalState::Error {
                    form,
                    message: err.user_message(),
                };
                Err(err)
            }
        }
    }

    /// The request succeeded; close the modal.
    pub fn succeed(&mut self) -> Result<(), CoreError> {
        if !self.is_submitting() {
            return Err(CoreError::Conflict("No submission in progress".into()));
        }
        self.state = ModalState::Closed;
        Ok(())
    }

    /// The request failed; show `message` and keep the form.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        match std::mem::replace(&mut self.state, ModalState::Closed) {
            ModalState::Submitting(form) => {
                self.state = ModalState::Error {
                    form,
                    message: message.into(),
                };
                Ok(())
            }
            other => {
                self.state = other;
                Err(CoreError::Conflict("No submission in progress".into()))
            }
        }
    }

    pub fn close(&mut self) -> Result<(), CoreError> {
        if self.is_submitting() {
            return Err(CoreError::Conflict(
                "Cannot close a form while it is being submitted".into(),
            ));
        }
        self.state = ModalState::Closed;
        Ok(())
    }
}

/// A form opened from a tree node action.
#[derive(Debug, Clone, PartialEq)]
pub enum SeededForm {
    Course(CourseForm),
    Section(SectionForm),
    AcademicYear(AcademicYearForm),
}

/// Build the form a node action opens, pre-seeded from the clicked node's
/// department, course and year.
pub fn seed_form(
    action: &NodeAction,
    structure: &AcademicStructure,
    today: NaiveDate,
) -> Result<SeededForm, CoreError> {
    match *action {
        NodeAction::AddCourse { department_id } => {
            let department = structure
                .department(department_id)
                .ok_or(CoreError::NotFound {
                    entity: "Department",
                    id: department_id,
                })?;
            Ok(SeededForm::Course(CourseForm::for_department(department)))
        }
        NodeAction::EditCourse { course_id } => {
            let course = find_course(structure, course_id)?;
            Ok(SeededForm::Course(CourseForm::edit(course)))
        }
        NodeAction::AddAcademicYears { course_id } => {
            find_course(structure, course_id)?;
            Ok(SeededForm::AcademicYear(AcademicYearForm::for_course(
                course_id,
            )))
        }
        NodeAction::AddSection {
            course_id,
            academic_year_id,
        } => {
            let course = find_course(structure, course_id)?;
            let year = structure
                .academic_year(academic_year_id)
                .ok_or(CoreError::NotFound {
                    entity: "AcademicYear",
                    id: academic_year_id,
                })?;
            Ok(SeededForm::Section(SectionForm::for_course(course, year, today)))
        }
        NodeAction::EditSection { section_id } => {
            let section = structure.section(section_id).ok_or(CoreError::NotFound {
                entity: "Section",
                id: section_id,
            })?;
            Ok(SeededForm::Section(SectionForm::edit(section)))
        }
    }
}

fn find_course(structure: &AcademicStructure, course_id: DbId) -> Result<&Course, CoreError> {
    structure.course(course_id).ok_or(CoreError::NotFound {
        entity: "Course",
        id: course_id,
    })
}

/// Collapse validator errors into a single [`CoreError::Validation`] carrying
/// the first message, ordered by `field_order`.
pub(crate) fn first_violation(errors: &ValidationErrors, field_order: &[&str]) -> CoreError {
    let fields = errors.field_errors();
    let mut entries: Vec<(String, String)> = fields
        .iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                (field.clone(), message)
            })
        })
        .collect();
    entries.sort_by_key(|(field, _)| {
        field_order
            .iter()
            .position(|f| *f == field.as_str())
            .unwrap_or(field_order.len())
    });

    match entries.into_iter().next() {
        Some((_, message)) => CoreError::Validation(message),
        None => CoreError::Validation("Invalid input".into()),
    }
}

/// Rejects empty and whitespace-only strings.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
