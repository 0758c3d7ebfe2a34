//! Invitations and registration approvals.
//!
//! Both check the hierarchy rules locally first, so a forbidden or invalid
//! request never reaches the backend.

use campus_core::approval::{can_review, decide, Decision, Registration};
use campus_core::invitation::{validate_invitation, Invitation};
use campus_core::roles::UserContext;

use crate::api::{ApiError, ApiService};

pub async fn send_invitation(
    api: &ApiService,
    inviter: &UserContext,
    invitation: &Invitation,
) -> Result<(), ApiError> {
    validate_invitation(inviter, invitation)?;
    api.send_invitation(invitation).await.map_err(|err| {
        tracing::error!(email = %invitation.email, role = %invitation.role, error = %err, "Invitation failed");
        err
    })?;
    tracing::info!(email = %invitation.email, role = %invitation.role, "Invitation sent");
    Ok(())
}

/// Pending registrations `reviewer` is allowed to decide on.
pub async fn reviewable_registrations(
    api: &ApiService,
    reviewer: &UserContext,
) -> Result<Vec<Registration>, ApiError> {
    let pending = api.get_pending_registrations().await?;
    let total = pending.len();
    let reviewable: Vec<Registration> = pending
        .into_iter()
        .filter(|registration| can_review(reviewer, registration))
        .collect();
    tracing::debug!(total, reviewable = reviewable.len(), "Pending registrations fetched");
    Ok(reviewable)
}

/// Approve or reject a pending registration and return the updated record.
pub async fn review_registration(
    api: &ApiService,
    reviewer: &UserContext,
    registration: &Registration,
    decision: &Decision,
) -> Result<Registration, ApiError> {
    let status = decide(reviewer, registration, decision)?;
    let updated = api.decide_registration(registration.id, decision).await?;
    tracing::info!(registration_id = registration.id, ?status, "Registration reviewed");
    Ok(updated)
}
