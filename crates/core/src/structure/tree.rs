//! Nested view of the hierarchy with empty states and per-node actions.

use serde::Serialize;

use super::AcademicStructure;
use crate::models::{AcademicYear, Course, CourseType, Department, Section};
use crate::roles::Role;
use crate::types::DbId;

/// What a level shows when it has no children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmptyState {
    NoDepartments,
    NoCourses,
    NoAcademicYears,
    NoSections,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoDepartments => "No Departments found",
            EmptyState::NoCourses => "No Courses in this Department",
            EmptyState::NoAcademicYears => "No Academic Years for this Course",
            EmptyState::NoSections => "No Sections in this Year",
        }
    }
}

/// An action icon on a node. Carries the context used to pre-seed the form
/// it opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeAction {
    AddCourse {
        department_id: DbId,
    },
    EditCourse {
        course_id: DbId,
    },
    AddAcademicYears {
        course_id: DbId,
    },
    AddSection {
        course_id: DbId,
        academic_year_id: DbId,
    },
    EditSection {
        section_id: DbId,
    },
}

impl NodeAction {
    pub fn label(&self) -> &'static str {
        match self {
            NodeAction::AddCourse { .. } => "Add Course",
            NodeAction::EditCourse { .. } => "Edit Course",
            NodeAction::AddAcademicYears { .. } => "Add Academic Years",
            NodeAction::AddSection { .. } => "Add Section",
            NodeAction::EditSection { .. } => "Edit Section",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StructureTree {
    pub departments: Vec<DepartmentNode>,
    pub empty: Option<EmptyState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentNode {
    pub department: Department,
    pub course_types: Vec<CourseTypeNode>,
    pub empty: Option<EmptyState>,
    pub actions: Vec<NodeAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseTypeNode {
    pub department_id: DbId,
    pub course_type: CourseType,
    pub courses: Vec<CourseNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseNode {
    pub course: Course,
    pub years: Vec<YearNode>,
    pub empty: Option<EmptyState>,
    pub actions: Vec<NodeAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearNode {
    pub year: AcademicYear,
    pub sections: Vec<SectionLeaf>,
    pub empty: Option<EmptyState>,
    pub actions: Vec<NodeAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionLeaf {
    pub section: Section,
    pub actions: Vec<NodeAction>,
}

fn empty_if<T>(items: &[T], state: EmptyState) -> Option<EmptyState> {
    items.is_empty().then_some(state)
}

impl AcademicStructure {
    /// Assemble the nested tree. Actions are only attached for roles that
    /// may manage the structure; the data is assumed to be role-scoped
    /// already.
    pub fn tree(&self, role: Role) -> StructureTree {
        let manage = role.can_manage_structure();
        let departments: Vec<DepartmentNode> = self
            .departments()
            .iter()
            .map(|d| self.department_node(d, manage))
            .collect();
        StructureTree {
            empty: empty_if(&departments, EmptyState::NoDepartments),
            departments,
        }
    }

    fn department_node(&self, department: &Department, manage: bool) -> DepartmentNode {
        let course_types: Vec<CourseTypeNode> = self
            .course_types_by_department(department.id)
            .into_iter()
            .map(|course_type| CourseTypeNode {
                department_id: department.id,
                courses: self
                    .courses_by_department_and_type(department.id, &course_type)
                    .into_iter()
                    .map(|c| self.course_node(c, manage))
                    .collect(),
                course_type,
            })
            .collect();

        let mut actions = Vec::new();
        if manage {
            actions.push(NodeAction::AddCourse {
                department_id: department.id,
            });
        }

        DepartmentNode {
            department: department.clone(),
            empty: empty_if(&course_types, EmptyState::NoCourses),
            course_types,
            actions,
        }
    }

    fn course_node(&self, course: &Course, manage: bool) -> CourseNode {
        let years: Vec<YearNode> = self
            .years_for_course(course.id)
            .into_iter()
            .map(|y| self.year_node(y, manage))
            .collect();

        let actions = if manage {
            vec![
                NodeAction::EditCourse {
                    course_id: course.id,
                },
                NodeAction::AddAcademicYears {
                    course_id: course.id,
                },
            ]
        } else {
            Vec::new()
        };

        CourseNode {
            course: course.clone(),
            empty: empty_if(&years, EmptyState::NoAcademicYears),
            years,
            actions,
        }
    }

    fn year_node(&self, year: &AcademicYear, manage: bool) -> YearNode {
        let sections: Vec<SectionLeaf> = self
            .sections_for_year(year.id)
            .into_iter()
            .map(|s| SectionLeaf {
                section: s.clone(),
                actions: if manage {
                    vec![NodeAction::EditSection { section_id: s.id }]
                } else {
                    Vec::new()
                },
            })
            .collect();

        let actions = if manage {
            vec![NodeAction::AddSection {
                course_id: year.course_id,
                academic_year_id: year.id,
            }]
        } else {
            Vec::new()
        };

        YearNode {
            year: year.clone(),
            empty: empty_if(&sections, EmptyState::NoSections),
            sections,
            actions,
        }
    }
}
