//! Role-scoped filtering of the four entity lists.
//!
//! | Role                     | Visible                                    |
//! |--------------------------|--------------------------------------------|
//! | `admin`, `principal`     | everything in the user's college           |
//! | `hod`, `staff`, `student`| only records of the user's department      |
//!
//! Field-name variants are already normalized by the model deserializers, so
//! each rule checks a single canonical field.

use std::collections::HashSet;

use crate::roles::UserContext;
use crate::structure::StructureSnapshot;
use crate::types::DbId;

/// Restrict a snapshot to what `user` may see. The revision is carried over
/// unchanged.
pub fn scope_snapshot(user: &UserContext, snapshot: &StructureSnapshot) -> StructureSnapshot {
    if user.role.has_college_scope() {
        return college_scope(user.college_id, snapshot);
    }

    let Some(department_id) = user.department_id else {
        return StructureSnapshot {
            revision: snapshot.revision,
            ..StructureSnapshot::default()
        };
    };

    department_scope(department_id, snapshot)
}

fn college_scope(college_id: Option<DbId>, snapshot: &StructureSnapshot) -> StructureSnapshot {
    let Some(college_id) = college_id else {
        return snapshot.clone();
    };
    let in_college = |record: Option<DbId>| record.map_or(true, |id| id == college_id);

    StructureSnapshot {
        revision: snapshot.revision,
        departments: snapshot
            .departments
            .iter()
            .filter(|d| in_college(d.college_id))
            .cloned()
            .collect(),
        courses: snapshot
            .courses
            .iter()
            .filter(|c| in_college(c.college_id))
            .cloned()
            .collect(),
        academic_years: snapshot.academic_years.clone(),
        sections: snapshot.sections.clone(),
    }
}

fn department_scope(department_id: DbId, snapshot: &StructureSnapshot) -> StructureSnapshot {
    let courses: Vec<_> = snapshot
        .courses
        .iter()
        .filter(|c| c.department_id == Some(department_id))
        .cloned()
        .collect();
    let course_ids: HashSet<DbId> = courses.iter().map(|c| c.id).collect();

    StructureSnapshot {
        revision: snapshot.revision,
        departments: snapshot
            .departments
            .iter()
            .filter(|d| d.id == department_id)
            .cloned()
            .collect(),
        academic_years: snapshot
            .academic_years
            .iter()
            .filter(|y| course_ids.contains(&y.course_id))
            .cloned()
            .collect(),
        sections: snapshot
            .sections
            .iter()
            .filter(|s| s.department_id == Some(department_id))
            .cloned()
            .collect(),
        courses,
    }
}
