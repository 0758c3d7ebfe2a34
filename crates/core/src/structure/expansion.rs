//! Expand/collapse state, one set of expanded node ids per level.
//!
//! Nothing here is persisted; a fresh session starts fully collapsed.

use std::collections::HashSet;

use super::AcademicStructure;
use crate::models::CourseType;
use crate::types::DbId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    departments: HashSet<DbId>,
    course_types: HashSet<(DbId, CourseType)>,
    courses: HashSet<DbId>,
    years: HashSet<DbId>,
}

fn toggle<T: Eq + std::hash::Hash>(set: &mut HashSet<T>, key: T) -> bool {
    if set.remove(&key) {
        false
    } else {
        set.insert(key);
        true
    }
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a department; returns whether it is now expanded.
    pub fn toggle_department(&mut self, department_id: DbId) -> bool {
        toggle(&mut self.departments, department_id)
    }

    pub fn toggle_course_type(&mut self, department_id: DbId, course_type: CourseType) -> bool {
        toggle(&mut self.course_types, (department_id, course_type))
    }

    pub fn toggle_course(&mut self, course_id: DbId) -> bool {
        toggle(&mut self.courses, course_id)
    }

    pub fn toggle_year(&mut self, academic_year_id: DbId) -> bool {
        toggle(&mut self.years, academic_year_id)
    }

    pub fn is_department_expanded(&self, department_id: DbId) -> bool {
        self.departments.contains(&department_id)
    }

    pub fn is_course_type_expanded(&self, department_id: DbId, course_type: &CourseType) -> bool {
        self.course_types
            .contains(&(department_id, course_type.clone()))
    }

    pub fn is_course_expanded(&self, course_id: DbId) -> bool {
        self.courses.contains(&course_id)
    }

    pub fn is_year_expanded(&self, academic_year_id: DbId) -> bool {
        self.years.contains(&academic_year_id)
    }

    /// Expand every node currently present in `structure`.
    pub fn expand_all(&mut self, structure: &AcademicStructure) {
        for department in structure.departments() {
            self.departments.insert(department.id);
            for course_type in structure.course_types_by_department(department.id) {
                self.course_types.insert((department.id, course_type));
            }
        }
        let snapshot = structure.snapshot();
        self.courses.extend(snapshot.courses.iter().map(|c| c.id));
        self.years
            .extend(snapshot.academic_years.iter().map(|y| y.id));
    }

    pub fn collapse_all(&mut self) {
        self.departments.clear();
        self.course_types.clear();
        self.courses.clear();
        self.years.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
            && self.course_types.is_empty()
            && self.courses.is_empty()
            && self.years.is_empty()
    }

    /// Sizes of the department, course-type, course and year sets.
    pub fn counts(&self) -> [usize; 4] {
        [
            self.departments.len(),
            self.course_types.len(),
            self.courses.len(),
            self.years.len(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::fixtures::sample;

    #[test]
    fn toggle_flips() {
        let mut state = ExpansionState::new();
        assert!(state.toggle_department(1));
        assert!(state.is_department_expanded(1));
        assert!(!state.toggle_department(1));
        assert!(!state.is_department_expanded(1));
    }

    #[test]
    fn levels_are_independent() {
        let mut state = ExpansionState::new();
        state.toggle_course(10);
        assert!(state.is_course_expanded(10));
        assert!(!state.is_year_expanded(10));
        assert!(!state.is_department_expanded(10));
    }

    #[test]
    fn expand_all_covers_every_level() {
        let structure = AcademicStructure::new(sample());
        let mut state = ExpansionState::new();
        state.expand_all(&structure);
        assert_eq!(state.counts(), [2, 2, 2, 2]);
        assert!(state.is_course_type_expanded(1, &CourseType::Postgraduate));

        state.collapse_all();
        assert!(state.is_empty());
    }
}
