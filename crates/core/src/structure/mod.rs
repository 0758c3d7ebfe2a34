//! The academic hierarchy: Department → Course Type → Course → Academic Year
//! → Section.
//!
//! The four entity lists are fetched independently and joined here. An
//! [`AcademicStructure`] indexes a [`StructureSnapshot`] once by parent id so
//! every lookup is a hash-map hit; [`StructureCache`] keeps the last index
//! until the snapshot revision changes.

pub mod expansion;
pub mod integrity;
pub mod render;
pub mod tree;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{AcademicYear, Course, CourseType, Department, Section};
use crate::types::DbId;

pub use expansion::ExpansionState;
pub use integrity::{integrity_report, IntegrityWarning};
pub use tree::{
    CourseNode, CourseTypeNode, DepartmentNode, EmptyState, NodeAction, SectionLeaf,
    StructureTree, YearNode,
};

/// The four flat lists as last loaded, tagged with a revision that changes
/// whenever any list is replaced or patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureSnapshot {
    pub revision: u64,
    pub departments: Vec<Department>,
    pub courses: Vec<Course>,
    pub academic_years: Vec<AcademicYear>,
    pub sections: Vec<Section>,
}

impl StructureSnapshot {
    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
            && self.courses.is_empty()
            && self.academic_years.is_empty()
            && self.sections.is_empty()
    }

    /// Replace the course with the same id, or append it.
    pub fn upsert_course(&mut self, course: Course) {
        upsert(&mut self.courses, course, |c| c.id);
        self.revision += 1;
    }

    pub fn upsert_section(&mut self, section: Section) {
        upsert(&mut self.sections, section, |s| s.id);
        self.revision += 1;
    }

    pub fn upsert_academic_years(&mut self, years: Vec<AcademicYear>) {
        for year in years {
            upsert(&mut self.academic_years, year, |y| y.id);
        }
        self.revision += 1;
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> DbId) {
    let key = id(&item);
    match items.iter_mut().find(|existing| id(existing) == key) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

/// Parent-id index over a snapshot.
#[derive(Debug, Clone)]
pub struct AcademicStructure {
    snapshot: StructureSnapshot,
    courses_by_department: HashMap<DbId, Vec<usize>>,
    years_by_course: HashMap<DbId, Vec<usize>>,
    sections_by_year: HashMap<DbId, Vec<usize>>,
}

impl AcademicStructure {
    pub fn new(snapshot: StructureSnapshot) -> Self {
        let mut courses_by_department: HashMap<DbId, Vec<usize>> = HashMap::new();
        for (i, course) in snapshot.courses.iter().enumerate() {
            if let Some(dept_id) = course.department_id {
                courses_by_department.entry(dept_id).or_default().push(i);
            }
        }

        let mut years_by_course: HashMap<DbId, Vec<usize>> = HashMap::new();
        for (i, year) in snapshot.academic_years.iter().enumerate() {
            years_by_course.entry(year.course_id).or_default().push(i);
        }
        for indices in years_by_course.values_mut() {
            indices.sort_by_key(|&i| snapshot.academic_years[i].year_number);
        }

        let mut sections_by_year: HashMap<DbId, Vec<usize>> = HashMap::new();
        for (i, section) in snapshot.sections.iter().enumerate() {
            sections_by_year
                .entry(section.academic_year_id)
                .or_default()
                .push(i);
        }

        Self {
            snapshot,
            courses_by_department,
            years_by_course,
            sections_by_year,
        }
    }

    pub fn snapshot(&self) -> &StructureSnapshot {
        &self.snapshot
    }

    pub fn departments(&self) -> &[Department] {
        &self.snapshot.departments
    }

    pub fn department(&self, id: DbId) -> Option<&Department> {
        self.snapshot.departments.iter().find(|d| d.id == id)
    }

    pub fn course(&self, id: DbId) -> Option<&Course> {
        self.snapshot.courses.iter().find(|c| c.id == id)
    }

    pub fn academic_year(&self, id: DbId) -> Option<&AcademicYear> {
        self.snapshot.academic_years.iter().find(|y| y.id == id)
    }

    pub fn section(&self, id: DbId) -> Option<&Section> {
        self.snapshot.sections.iter().find(|s| s.id == id)
    }

    pub fn courses_by_department(&self, department_id: DbId) -> Vec<&Course> {
        self.courses_by_department
            .get(&department_id)
            .map(|indices| indices.iter().map(|&i| &self.snapshot.courses[i]).collect())
            .unwrap_or_default()
    }

    /// Distinct course types offered by a department, in first-seen order.
    pub fn course_types_by_department(&self, department_id: DbId) -> Vec<CourseType> {
        let mut types: Vec<CourseType> = Vec::new();
        for course in self.courses_by_department(department_id) {
            if !types.contains(&course.course_type) {
                types.push(course.course_type.clone());
            }
        }
        types
    }

    pub fn courses_by_department_and_type(
        &self,
        department_id: DbId,
        course_type: &CourseType,
    ) -> Vec<&Course> {
        self.courses_by_department(department_id)
            .into_iter()
            .filter(|c| &c.course_type == course_type)
            .collect()
    }

    /// Years of a course ordered by year number.
    pub fn years_for_course(&self, course_id: DbId) -> Vec<&AcademicYear> {
        self.years_by_course
            .get(&course_id)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| &self.snapshot.academic_years[i])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn sections_for_year(&self, academic_year_id: DbId) -> Vec<&Section> {
        self.sections_by_year
            .get(&academic_year_id)
            .map(|indices| indices.iter().map(|&i| &self.snapshot.sections[i]).collect())
            .unwrap_or_default()
    }
}

/// Single-entry cache of the last built structure.
///
/// The key is whatever identifies the inputs (typically snapshot revision
/// plus the scoping user); a different key rebuilds.
#[derive(Debug)]
pub struct StructureCache<K> {
    entry: Option<(K, AcademicStructure)>,
    builds: u64,
}

impl<K> Default for StructureCache<K> {
    fn default() -> Self {
        Self {
            entry: None,
            builds: 0,
        }
    }
}

impl<K: PartialEq> StructureCache<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(
        &mut self,
        key: K,
        build: impl FnOnce() -> AcademicStructure,
    ) -> &AcademicStructure {
        let stale = !matches!(&self.entry, Some((cached, _)) if *cached == key);
        if stale {
            self.entry = None;
            self.builds += 1;
        }
        let (_, structure) = self.entry.get_or_insert_with(|| (key, build()));
        structure
    }

    /// Number of times the structure has been rebuilt.
    pub fn builds(&self) -> u64 {
        self.builds
    }
}
