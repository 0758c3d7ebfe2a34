//! Loaded academic structure for one signed-in user.
//!
//! A [`StructureSession`] owns the last loaded snapshot, scopes it to the
//! user's role, caches the derived structure per snapshot revision and keeps
//! the expand/collapse state. Saving a form merges the entity the backend
//! returns into the snapshot instead of reloading all four lists.
//!
//! Loads are tied to the session's cancellation token: dropping the session
//! or calling [`StructureSession::shutdown`] abandons any load in flight.

use campus_core::error::CoreError;
use campus_core::forms::{seed_form, AcademicYearForm, CourseForm, Modal, SectionForm, SeededForm};
use campus_core::models::{AcademicYear, Course, Department, Section};
use campus_core::roles::{Role, UserContext};
use campus_core::scope::scope_snapshot;
use campus_core::structure::render::render_tree;
use campus_core::structure::{
    integrity_report, AcademicStructure, ExpansionState, IntegrityWarning, NodeAction,
    StructureCache, StructureSnapshot, StructureTree,
};
use campus_core::types::DbId;
use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, ApiService};
use crate::loader::{load_structure, LoadOutcome};

/// Result of [`StructureSession::reload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadStatus {
    Applied,
    Cancelled,
}

pub struct StructureSession {
    api: ApiService,
    user: UserContext,
    snapshot: StructureSnapshot,
    cache: StructureCache<(u64, UserContext)>,
    expansion: ExpansionState,
    last_error: Option<String>,
    loaded: bool,
    /// Cancelled when the session goes away; each load uses a child token.
    lifetime: CancellationToken,
}

fn scoped<'a>(
    cache: &'a mut StructureCache<(u64, UserContext)>,
    user: &UserContext,
    snapshot: &StructureSnapshot,
) -> &'a AcademicStructure {
    cache.get_or_build((snapshot.revision, user.clone()), || {
        AcademicStructure::new(scope_snapshot(user, snapshot))
    })
}

impl StructureSession {
    pub fn new(api: ApiService, user: UserContext) -> Self {
        Self {
            api,
            user,
            snapshot: StructureSnapshot::default(),
            cache: StructureCache::new(),
            expansion: ExpansionState::new(),
            last_error: None,
            loaded: false,
            lifetime: CancellationToken::new(),
        }
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn api(&self) -> &ApiService {
        &self.api
    }

    /// Token that abandons loads when cancelled. Clone it into whatever
    /// owns the session's lifetime.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    pub fn shutdown(&self) {
        self.lifetime.cancel();
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Message of the last failed load, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The unscoped lists as loaded and patched.
    pub fn snapshot(&self) -> &StructureSnapshot {
        &self.snapshot
    }

    /// Fetch all four lists and replace the held snapshot.
    ///
    /// On failure the previous data stays in place and the error is
    /// recorded in [`last_error`](Self::last_error).
    ///
    /// Loads never overlap because this borrows the session mutably. A load
    /// is superseded by dropping its future (a timeout, or a `select!` arm
    /// losing), which drops the in-flight requests before anything is
    /// applied; the next call starts from the current snapshot.
    pub async fn reload(&mut self) -> Result<ReloadStatus, ApiError> {
        let token = self.lifetime.child_token();
        match load_structure(&self.api, self.user.college_id, &token).await {
            Ok(LoadOutcome::Loaded(lists)) => {
                self.snapshot = StructureSnapshot {
                    revision: self.snapshot.revision + 1,
                    departments: lists.departments,
                    courses: lists.courses,
                    academic_years: lists.academic_years,
                    sections: lists.sections,
                };
                self.last_error = None;
                self.loaded = true;
                Ok(ReloadStatus::Applied)
            }
            Ok(LoadOutcome::Cancelled) => Ok(ReloadStatus::Cancelled),
            Err(err) => {
                self.last_error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// The role-scoped structure, rebuilt only when the snapshot changed.
    pub fn structure(&mut self) -> &AcademicStructure {
        scoped(&mut self.cache, &self.user, &self.snapshot)
    }

    pub fn tree(&mut self) -> StructureTree {
        let role = self.user.role;
        self.structure().tree(role)
    }

    pub fn render(&mut self) -> String {
        let tree = self.tree();
        render_tree(&tree, &self.expansion)
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn expansion_mut(&mut self) -> &mut ExpansionState {
        &mut self.expansion
    }

    pub fn expand_all(&mut self) {
        let structure = scoped(&mut self.cache, &self.user, &self.snapshot);
        self.expansion.expand_all(structure);
    }

    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all();
    }

    /// Consistency warnings for the data visible to this user.
    pub fn integrity_warnings(&mut self) -> Vec<IntegrityWarning> {
        integrity_report(self.structure().snapshot())
    }

    // ---- forms ----

    /// Build the form a node action opens.
    pub fn open_form(
        &mut self,
        action: &NodeAction,
        today: NaiveDate,
    ) -> Result<SeededForm, CoreError> {
        self.ensure_can_manage(&[])?;
        seed_form(action, self.structure(), today)
    }

    /// Departments offered by the course form's dropdown.
    pub async fn department_options(&self) -> Result<Vec<Department>, ApiError> {
        let departments = match self.user.college_id {
            Some(college_id) => self.api.get_departments_by_college(college_id).await?,
            None => self.api.get_departments(None).await?,
        };
        Ok(match (self.user.role, self.user.department_id) {
            (Role::Hod, Some(own)) => departments.into_iter().filter(|d| d.id == own).collect(),
            _ => departments,
        })
    }

    pub async fn submit_course(&mut self, modal: &mut Modal<CourseForm>) -> Result<Course, ApiError> {
        let Some(form) = modal.form() else {
            return Err(CoreError::Conflict("Form is not open for submission".into()).into());
        };
        let course_id = form.course_id;
        let mut touched = vec![form.department_id];
        if let Some(id) = course_id {
            touched.push(self.stored_course_department(id));
        }
        self.ensure_can_manage(&touched)?;
        let payload = modal.begin_submit()?;

        let result = match course_id {
            Some(id) => self.api.update_course(id, &payload).await,
            None => self.api.create_course(&payload).await,
        };

        match result {
            Ok(course) => {
                tracing::info!(course_id = course.id, updated = course_id.is_some(), "Course saved");
                self.snapshot.upsert_course(course.clone());
                modal.succeed()?;
                Ok(course)
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to save course");
                modal.fail(err.user_message())?;
                Err(err)
            }
        }
    }

    pub async fn submit_section(
        &mut self,
        modal: &mut Modal<SectionForm>,
    ) -> Result<Section, ApiError> {
        let Some(form) = modal.form() else {
            return Err(CoreError::Conflict("Form is not open for submission".into()).into());
        };
        let section_id = form.section_id;
        let mut touched = vec![form.department_id];
        if let Some(id) = form.course_id {
            touched.push(self.stored_course_department(id));
        }
        if let Some(id) = section_id {
            touched.push(
                self.snapshot
                    .sections
                    .iter()
                    .find(|s| s.id == id)
                    .and_then(|s| s.department_id),
            );
        }
        self.ensure_can_manage(&touched)?;
        let payload = modal.begin_submit()?;

        let result = match section_id {
            Some(id) => self.api.update_section(id, &payload).await,
            None => self.api.create_section(&payload).await,
        };

        match result {
            Ok(section) => {
                tracing::info!(section_id = section.id, updated = section_id.is_some(), "Section saved");
                self.snapshot.upsert_section(section.clone());
                modal.succeed()?;
                Ok(section)
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to save section");
                modal.fail(err.user_message())?;
                Err(err)
            }
        }
    }

    pub async fn submit_academic_years(
        &mut self,
        modal: &mut Modal<AcademicYearForm>,
    ) -> Result<Vec<AcademicYear>, ApiError> {
        let Some(course_id) = modal.form().map(|f| f.course_id) else {
            return Err(CoreError::Conflict("Form is not open for submission".into()).into());
        };
        self.ensure_can_manage(&[self.stored_course_department(course_id)])?;
        let payload = modal.begin_submit()?;

        match self.api.create_academic_years(course_id, &payload).await {
            Ok(years) => {
                tracing::info!(course_id, created = years.len(), "Academic years created");
                self.snapshot.upsert_academic_years(years.clone());
                modal.succeed()?;
                Ok(years)
            }
            Err(err) => {
                tracing::error!(course_id, error = %err, "Failed to create academic years");
                modal.fail(err.user_message())?;
                Err(err)
            }
        }
    }

    /// Department of a loaded course, looked up before role scoping so a
    /// hod cannot reach records outside their view. `None` when unknown.
    fn stored_course_department(&self, course_id: DbId) -> Option<DbId> {
        self.snapshot
            .courses
            .iter()
            .find(|c| c.id == course_id)
            .and_then(|c| c.department_id)
    }

    /// Structure edits need a managing role. A hod may only touch records
    /// whose every department in `touched` is their own; an unknown
    /// department counts as foreign.
    fn ensure_can_manage(&self, touched: &[Option<DbId>]) -> Result<(), CoreError> {
        if !self.user.role.can_manage_structure() {
            return Err(CoreError::Forbidden(format!(
                "A {} cannot edit the academic structure",
                self.user.role
            )));
        }
        if self.user.role == Role::Hod {
            let own = self.user.department_id;
            if own.is_none() || touched.iter().any(|department| *department != own) {
                return Err(CoreError::Forbidden(
                    "Changes are limited to your own department".into(),
                ));
            }
        }
        Ok(())
    }
}

impl Drop for StructureSession {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
