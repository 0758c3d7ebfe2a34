//! Registration approval workflow.
//!
//! A self-registered user waits in `pending` until a reviewer approves or
//! rejects them. Decisions are final.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::{Role, UserContext};
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, alias = "college_id")]
    pub college_id: Option<DbId>,
    #[serde(default, alias = "department_id")]
    pub department_id: Option<DbId>,
    pub status: RegistrationStatus,
    #[serde(default, alias = "rejection_reason")]
    pub rejection_reason: Option<String>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<Timestamp>,
}

/// Reviewer's decision; serialized as the body of
/// `PUT /registrations/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected { reason: String },
}

/// Whether `reviewer` may decide on `registration` at all.
pub fn can_review(reviewer: &UserContext, registration: &Registration) -> bool {
    match reviewer.role {
        Role::Admin | Role::Principal => match (reviewer.college_id, registration.college_id) {
            (Some(own), Some(target)) => own == target,
            _ => true,
        },
        Role::Hod => {
            reviewer.department_id.is_some()
                && reviewer.department_id == registration.department_id
        }
        Role::Staff | Role::Student => false,
    }
}

/// Apply `decision` and return the resulting status.
pub fn decide(
    reviewer: &UserContext,
    registration: &Registration,
    decision: &Decision,
) -> Result<RegistrationStatus, CoreError> {
    if !can_review(reviewer, registration) {
        return Err(CoreError::Forbidden(format!(
            "A {} cannot review this registration",
            reviewer.role
        )));
    }
    if registration.status != RegistrationStatus::Pending {
        return Err(CoreError::Conflict(format!(
            "Registration {} has already been decided",
            registration.id
        )));
    }
    match decision {
        Decision::Approved => Ok(RegistrationStatus::Approved),
        Decision::Rejected { reason } if reason.trim().is_empty() => Err(CoreError::Validation(
            "A reason is required to reject a registration".into(),
        )),
        Decision::Rejected { .. } => Ok(RegistrationStatus::Rejected),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn pending(department_id: Option<DbId>) -> Registration {
        Registration {
            id: 7,
            name: "Asha".into(),
            email: "asha@college.edu".into(),
            role: Role::Student,
            college_id: Some(1),
            department_id,
            status: RegistrationStatus::Pending,
            rejection_reason: None,
            created_at: None,
        }
    }

    #[test]
    fn principal_approves() {
        let principal = UserContext::new(Role::Principal, Some(1), None);
        assert_eq!(
            decide(&principal, &pending(Some(3)), &Decision::Approved),
            Ok(RegistrationStatus::Approved)
        );
    }

    #[test]
    fn hod_only_for_own_department() {
        let hod = UserContext::new(Role::Hod, Some(1), Some(3));
        assert!(decide(&hod, &pending(Some(3)), &Decision::Approved).is_ok());
        assert_matches!(
            decide(&hod, &pending(Some(4)), &Decision::Approved),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn rejection_needs_reason() {
        let admin = UserContext::new(Role::Admin, None, None);
        assert_matches!(
            decide(
                &admin,
                &pending(None),
                &Decision::Rejected { reason: " ".into() }
            ),
            Err(CoreError::Validation(_))
        );
        assert_eq!(
            decide(
                &admin,
                &pending(None),
                &Decision::Rejected {
                    reason: "Duplicate account".into()
                }
            ),
            Ok(RegistrationStatus::Rejected)
        );
    }

    #[test]
    fn decisions_are_final() {
        let admin = UserContext::new(Role::Admin, Some(1), None);
        let mut registration = pending(None);
        registration.status = RegistrationStatus::Approved;
        assert_matches!(
            decide(&admin, &registration, &Decision::Approved),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn decision_serializes_with_status_tag() {
        let json = serde_json::to_value(Decision::Rejected {
            reason: "Incomplete".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"status": "rejected", "reason": "Incomplete"}));
    }

    #[test]
    fn staff_cannot_review() {
        let staff = UserContext::new(Role::Staff, Some(1), Some(3));
        assert!(!can_review(&staff, &pending(Some(3))));
    }
}
