//! HTTP side of the campus academic-structure views.
//!
//! [`api::ApiService`] wraps the LMS REST endpoints, [`loader`] fetches the
//! four entity lists concurrently under a cancellation token, and
//! [`session::StructureSession`] holds the loaded data, merges mutation
//! results and serves the role-scoped tree. [`workflow`] covers invitations
//! and registration decisions.

pub mod api;
pub mod config;
pub mod envelope;
pub mod loader;
pub mod session;
pub mod workflow;
