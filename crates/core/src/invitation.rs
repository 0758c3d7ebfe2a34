//! Who may invite whom.
//!
//! | Inviter     | May invite                | Placement            |
//! |-------------|---------------------------|----------------------|
//! | `admin`     | principal, hod, staff     | any department       |
//! | `principal` | hod, staff, student       | any department       |
//! | `hod`       | staff, student            | own department only  |
//! | `staff`     | student                   | own department only  |
//! | `student`   | nobody                    |                      |

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::forms::first_violation;
use crate::roles::{Role, UserContext};
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<DbId>,
}

pub fn invitable_roles(inviter: Role) -> &'static [Role] {
    match inviter {
        Role::Admin => &[Role::Principal, Role::Hod, Role::Staff],
        Role::Principal => &[Role::Hod, Role::Staff, Role::Student],
        Role::Hod => &[Role::Staff, Role::Student],
        Role::Staff => &[Role::Student],
        Role::Student => &[],
    }
}

pub fn can_invite(inviter: Role, invitee: Role) -> bool {
    invitable_roles(inviter).contains(&invitee)
}

/// Check an invitation before it is sent. Department-bound roles (hod,
/// staff, student) must be placed in a department; inviters without
/// college scope may only place invitees in their own department.
pub fn validate_invitation(inviter: &UserContext, invitation: &Invitation) -> Result<(), CoreError> {
    if !can_invite(inviter.role, invitation.role) {
        return Err(CoreError::Forbidden(format!(
            "A {} cannot invite a {}",
            inviter.role, invitation.role
        )));
    }

    invitation
        .validate()
        .map_err(|errors| first_violation(&errors, &["email"]))?;

    let needs_department = matches!(invitation.role, Role::Hod | Role::Staff | Role::Student);
    if needs_department && invitation.department_id.is_none() {
        return Err(CoreError::Validation(format!(
            "A department is required when inviting a {}",
            invitation.role
        )));
    }

    if !inviter.role.has_college_scope() {
        if inviter.department_id.is_none() || invitation.department_id != inviter.department_id {
            return Err(CoreError::Forbidden(
                "Invitations are limited to your own department".into(),
            ));
        }
    } else if let (Some(own), Some(target)) = (inviter.college_id, invitation.college_id) {
        if own != target {
            return Err(CoreError::Forbidden(
                "Invitations are limited to your own college".into(),
            ));
        }
    }

    Ok(())
}
