//! Cross-entity consistency checks.
//!
//! None of these are enforced: the backend owns consistency, and a section
//! may legitimately have been moved to another department. The report is
//! informational.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::StructureSnapshot;
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityWarning {
    /// A section's department differs from its course's department.
    SectionDepartmentMismatch {
        section_id: DbId,
        section_department_id: Option<DbId>,
        course_department_id: Option<DbId>,
    },
    /// Two academic years of one course share a year number.
    DuplicateYearNumber { course_id: DbId, year_number: u32 },
    /// More students enrolled than the section allows.
    SectionOverCapacity {
        section_id: DbId,
        max_students: u32,
        current_students: u32,
    },
}

pub fn integrity_report(snapshot: &StructureSnapshot) -> Vec<IntegrityWarning> {
    let mut warnings = Vec::new();

    let course_departments: HashMap<DbId, Option<DbId>> = snapshot
        .courses
        .iter()
        .map(|c| (c.id, c.department_id))
        .collect();

    for section in &snapshot.sections {
        if let Some(&course_department_id) = course_departments.get(&section.course_id) {
            if course_department_id != section.department_id {
                warnings.push(IntegrityWarning::SectionDepartmentMismatch {
                    section_id: section.id,
                    section_department_id: section.department_id,
                    course_department_id,
                });
            }
        }
        if section.current_students > section.max_students {
            warnings.push(IntegrityWarning::SectionOverCapacity {
                section_id: section.id,
                max_students: section.max_students,
                current_students: section.current_students,
            });
        }
    }

    let mut seen: HashSet<(DbId, u32)> = HashSet::new();
    let mut reported: HashSet<(DbId, u32)> = HashSet::new();
    for year in &snapshot.academic_years {
        let key = (year.course_id, year.year_number);
        if !seen.insert(key) && reported.insert(key) {
            warnings.push(IntegrityWarning::DuplicateYearNumber {
                course_id: year.course_id,
                year_number: year.year_number,
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::fixtures::{sample, year};

    #[test]
    fn clean_snapshot_has_no_warnings() {
        assert!(integrity_report(&sample()).is_empty());
    }

    #[test]
    fn flags_department_mismatch() {
        let mut snapshot = sample();
        snapshot.sections[0].department_id = Some(2);
        assert_eq!(
            integrity_report(&snapshot),
            vec![IntegrityWarning::SectionDepartmentMismatch {
                section_id: 1000,
                section_department_id: Some(2),
                course_department_id: Some(1),
            }]
        );
    }

    #[test]
    fn duplicate_year_reported_once() {
        let mut snapshot = sample();
        snapshot.academic_years.push(year(102, 10, 1));
        snapshot.academic_years.push(year(103, 10, 1));
        let warnings = integrity_report(&snapshot);
        assert_eq!(
            warnings,
            vec![IntegrityWarning::DuplicateYearNumber {
                course_id: 10,
                year_number: 1
            }]
        );
    }

    #[test]
    fn flags_over_capacity() {
        let mut snapshot = sample();
        snapshot.sections[0].current_students = 61;
        assert!(matches!(
            integrity_report(&snapshot)[..],
            [IntegrityWarning::SectionOverCapacity { section_id: 1000, .. }]
        ));
    }
}
