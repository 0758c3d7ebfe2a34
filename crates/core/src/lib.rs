//! Domain logic for the campus academic-structure views.
//!
//! Everything in this crate is pure: entity models, role scoping, the
//! department → course type → course → year → section hierarchy, form
//! validation, invitations, list paging and registration approvals. Network
//! access lives in `campus-client`.

pub mod approval;
pub mod error;
pub mod forms;
pub mod invitation;
pub mod listing;
pub mod models;
pub mod roles;
pub mod scope;
pub mod structure;
pub mod types;
