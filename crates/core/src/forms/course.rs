//! Course create/edit form.

use serde::Serialize;
use validator::Validate;

use super::{first_violation, not_blank, EntityForm};
use crate::error::CoreError;
use crate::models::{Course, CourseType, Department};
use crate::types::DbId;

const FIELD_ORDER: &[&str] = &["name", "code", "course_type", "department_id"];

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CourseForm {
    /// Set when editing an existing course.
    pub course_id: Option<DbId>,
    #[validate(custom(function = "not_blank", message = "Course name is required"))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Course code is required"))]
    pub code: String,
    #[validate(required(message = "Course type is required"))]
    pub course_type: Option<CourseType>,
    #[validate(required(message = "Department is required"))]
    pub department_id: Option<DbId>,
    pub college_id: Option<DbId>,
    pub is_active: bool,
    locked_department: bool,
}

impl Default for CourseForm {
    fn default() -> Self {
        Self {
            course_id: None,
            name: String::new(),
            code: String::new(),
            course_type: None,
            department_id: None,
            college_id: None,
            is_active: true,
            locked_department: false,
        }
    }
}

impl CourseForm {
    /// Blank form with a department dropdown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form opened from a department's "Add Course" action. The department
    /// is shown read-only and cannot be changed.
    pub fn for_department(department: &Department) -> Self {
        Self {
            department_id: Some(department.id),
            college_id: department.college_id,
            locked_department: true,
            ..Self::default()
        }
    }

    pub fn edit(course: &Course) -> Self {
        Self {
            course_id: Some(course.id),
            name: course.name.clone(),
            code: course.code.clone(),
            course_type: Some(course.course_type.clone()),
            department_id: course.department_id,
            college_id: course.college_id,
            is_active: course.is_active,
            locked_department: false,
        }
    }

    pub fn is_department_locked(&self) -> bool {
        self.locked_department
    }

    pub fn set_department(&mut self, department_id: DbId) -> Result<(), CoreError> {
        if self.locked_department {
            return Err(CoreError::Conflict(
                "Department is fixed for this course".into(),
            ));
        }
        self.department_id = Some(department_id);
        Ok(())
    }
}

/// Body of `POST /courses` and `PUT /courses/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub department_id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college_id: Option<DbId>,
    pub is_active: bool,
}

impl EntityForm for CourseForm {
    type Payload = CoursePayload;

    fn to_payload(&self) -> Result<CoursePayload, CoreError> {
        self.validate()
            .map_err(|errors| first_violation(&errors, FIELD_ORDER))?;

        let (Some(course_type), Some(department_id)) = (&self.course_type, self.department_id)
        else {
            return Err(CoreError::Validation("Course type and department are required".into()));
        };

        Ok(CoursePayload {
            name: self.name.trim().to_string(),
            code: self.code.trim().to_string(),
            course_type: course_type.clone(),
            department_id,
            college_id: self.college_id,
            is_active: self.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn physics() -> Department {
        Department {
            id: 4,
            name: "Physics".into(),
            code: "PHY".into(),
            college_id: Some(1),
            hod_id: None,
        }
    }

    #[test]
    fn locked_department_is_sent() {
        let mut form = CourseForm::for_department(&physics());
        form.name = "M.Sc Physics".into();
        form.code = "MSCPHY".into();
        form.course_type = Some(CourseType::Postgraduate);

        assert_matches!(form.set_department(9), Err(CoreError::Conflict(_)));
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.department_id, 4);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["departmentId"], 4);
        assert_eq!(json["type"], "postgraduate");
        assert_eq!(json["collegeId"], 1);
    }

    #[test]
    fn missing_fields_reported_in_order() {
        let form = CourseForm::new();
        assert_eq!(
            form.to_payload(),
            Err(CoreError::Validation("Course name is required".into()))
        );

        let mut form = CourseForm::new();
        form.name = "X".into();
        form.code = "X".into();
        form.course_type = Some(CourseType::Diploma);
        assert_eq!(
            form.to_payload(),
            Err(CoreError::Validation("Department is required".into()))
        );
    }

    #[test]
    fn unlocked_department_can_be_chosen() {
        let mut form = CourseForm::new();
        form.set_department(3).unwrap();
        assert_eq!(form.department_id, Some(3));
    }

    #[test]
    fn values_are_trimmed() {
        let mut form = CourseForm::for_department(&physics());
        form.name = "  B.Sc  ".into();
        form.code = " BSC ".into();
        form.course_type = Some(CourseType::Undergraduate);
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.name, "B.Sc");
        assert_eq!(payload.code, "BSC");
    }
}
