//! Role names and the signed-in user's affiliation.
//!
//! The string constants must match the role names the backend issues.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PRINCIPAL: &str = "principal";
pub const ROLE_HOD: &str = "hod";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_STUDENT: &str = "student";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Principal,
    Hod,
    Staff,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Principal => ROLE_PRINCIPAL,
            Role::Hod => ROLE_HOD,
            Role::Staff => ROLE_STAFF,
            Role::Student => ROLE_STUDENT,
        }
    }

    /// Admins and principals see the whole college.
    pub fn has_college_scope(self) -> bool {
        matches!(self, Role::Admin | Role::Principal)
    }

    /// Roles allowed to create and edit courses, years and sections.
    pub fn can_manage_structure(self) -> bool {
        matches!(self, Role::Admin | Role::Principal | Role::Hod)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_PRINCIPAL => Ok(Role::Principal),
            ROLE_HOD => Ok(Role::Hod),
            ROLE_STAFF => Ok(Role::Staff),
            ROLE_STUDENT => Ok(Role::Student),
            other => Err(CoreError::Validation(format!("Unknown role: {other}"))),
        }
    }
}

/// The current user as far as scoping decisions are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub role: Role,
    #[serde(default, alias = "college_id")]
    pub college_id: Option<DbId>,
    #[serde(default, alias = "department_id")]
    pub department_id: Option<DbId>,
}

impl UserContext {
    pub fn new(role: Role, college_id: Option<DbId>, department_id: Option<DbId>) -> Self {
        Self {
            role,
            college_id,
            department_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("HOD".parse::<Role>().unwrap(), Role::Hod);
        assert_eq!(" Principal ".parse::<Role>().unwrap(), Role::Principal);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_matches!("dean".parse::<Role>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn display_matches_constants() {
        assert_eq!(Role::Student.to_string(), ROLE_STUDENT);
        assert_eq!(Role::Admin.to_string(), ROLE_ADMIN);
    }

    #[test]
    fn user_context_accepts_snake_case() {
        let user: UserContext =
            serde_json::from_str(r#"{"role":"hod","college_id":1,"department_id":7}"#).unwrap();
        assert_eq!(user, UserContext::new(Role::Hod, Some(1), Some(7)));
    }
}
