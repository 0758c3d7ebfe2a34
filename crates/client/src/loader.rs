//! Concurrent, cancellable loading of the four structure lists.
//!
//! The department, course, academic-year and section requests are
//! independent and run at the same time. The whole load is raced against a
//! [`CancellationToken`]; once the token fires the in-flight requests are
//! dropped and their responses are never applied.

use campus_core::models::{AcademicYear, Course, Department, Section};
use campus_core::types::DbId;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, ApiService};

/// The raw lists returned by one load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureLists {
    pub departments: Vec<Department>,
    pub courses: Vec<Course>,
    pub academic_years: Vec<AcademicYear>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(StructureLists),
    /// The token fired first; nothing was loaded.
    Cancelled,
}

/// Fetch all four lists. The first failing request fails the load.
pub async fn load_structure(
    api: &ApiService,
    college_id: Option<DbId>,
    cancel: &CancellationToken,
) -> Result<LoadOutcome, ApiError> {
    let fetch = async {
        tokio::try_join!(
            api.get_departments(college_id),
            api.get_courses(college_id),
            api.get_academic_years(),
            api.get_sections(),
        )
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::info!(college_id, "Structure load cancelled");
            Ok(LoadOutcome::Cancelled)
        }
        result = fetch => {
            let (departments, courses, academic_years, sections) = result.map_err(|e| {
                tracing::error!(college_id, error = %e, "Structure load failed");
                e
            })?;
            tracing::info!(
                college_id,
                departments = departments.len(),
                courses = courses.len(),
                academic_years = academic_years.len(),
                sections = sections.len(),
                "Structure loaded",
            );
            Ok(LoadOutcome::Loaded(StructureLists {
                departments,
                courses,
                academic_years,
                sections,
            }))
        }
    }
}
