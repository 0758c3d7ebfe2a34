use std::time::Duration;

use campus_core::roles::{Role, UserContext};
use campus_core::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the LMS REST API, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request, if any.
    pub api_token: Option<String>,
    pub request_timeout: Duration,
    /// The user the structure is scoped for.
    pub user: UserContext,
    /// Print every level of the outline, not just departments.
    pub expand_all: bool,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                     |
    /// |-------------------------------|-----------------------------|
    /// | `CAMPUS_API_URL`              | `http://localhost:5000/api` |
    /// | `CAMPUS_API_TOKEN`            | none                        |
    /// | `CAMPUS_REQUEST_TIMEOUT_SECS` | `30`                        |
    /// | `CAMPUS_ROLE`                 | `admin`                     |
    /// | `CAMPUS_COLLEGE_ID`           | none                        |
    /// | `CAMPUS_DEPARTMENT_ID`        | none                        |
    /// | `CAMPUS_EXPAND_ALL`           | `true`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an arbitrary
    /// source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get("CAMPUS_API_URL")
            .unwrap_or_else(|| "http://localhost:5000/api".into())
            .trim_end_matches('/')
            .to_string();

        let api_token = get("CAMPUS_API_TOKEN");

        let timeout_secs: u64 = match get("CAMPUS_REQUEST_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "CAMPUS_REQUEST_TIMEOUT_SECS",
                expected: "a number of seconds",
                value: v.clone(),
            })?,
            None => 30,
        };

        let role: Role = match get("CAMPUS_ROLE") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "CAMPUS_ROLE",
                expected: "one of admin, principal, hod, staff, student",
                value: v.clone(),
            })?,
            None => Role::Admin,
        };

        let college_id = parse_id(get("CAMPUS_COLLEGE_ID"), "CAMPUS_COLLEGE_ID")?;
        let department_id = parse_id(get("CAMPUS_DEPARTMENT_ID"), "CAMPUS_DEPARTMENT_ID")?;

        let expand_all = match get("CAMPUS_EXPAND_ALL") {
            Some(v) => parse_flag(&v).ok_or_else(|| ConfigError::Invalid {
                var: "CAMPUS_EXPAND_ALL",
                expected: "a boolean (true/false)",
                value: v.clone(),
            })?,
            None => true,
        };

        Ok(Self {
            api_url,
            api_token,
            request_timeout: Duration::from_secs(timeout_secs),
            user: UserContext::new(role, college_id, department_id),
            expand_all,
        })
    }
}

fn parse_id(value: Option<String>, var: &'static str) -> Result<Option<DbId>, ConfigError> {
    value
        .map(|v| {
            v.trim().parse().map_err(|_| ConfigError::Invalid {
                var,
                expected: "an integer id",
                value: v.clone(),
            })
        })
        .transpose()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.api_url, "http://localhost:5000/api");
        assert_eq!(cfg.api_token, None);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.user, UserContext::new(Role::Admin, None, None));
        assert!(cfg.expand_all);
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("CAMPUS_API_URL", "https://lms.example.edu/api/"),
            ("CAMPUS_API_TOKEN", "abc"),
            ("CAMPUS_REQUEST_TIMEOUT_SECS", "5"),
            ("CAMPUS_ROLE", "HOD"),
            ("CAMPUS_COLLEGE_ID", "2"),
            ("CAMPUS_DEPARTMENT_ID", "14"),
            ("CAMPUS_EXPAND_ALL", "No"),
        ])
        .unwrap();
        assert_eq!(cfg.api_url, "https://lms.example.edu/api");
        assert_eq!(cfg.api_token.as_deref(), Some("abc"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.user, UserContext::new(Role::Hod, Some(2), Some(14)));
        assert!(!cfg.expand_all);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert_matches!(
            config(&[("CAMPUS_ROLE", "dean")]),
            Err(ConfigError::Invalid {
                var: "CAMPUS_ROLE",
                ..
            })
        );
        assert_matches!(
            config(&[("CAMPUS_DEPARTMENT_ID", "cs")]),
            Err(ConfigError::Invalid {
                var: "CAMPUS_DEPARTMENT_ID",
                ..
            })
        );
        assert_matches!(
            config(&[("CAMPUS_EXPAND_ALL", "maybe")]),
            Err(ConfigError::Invalid {
                var: "CAMPUS_EXPAND_ALL",
                ..
            })
        );
    }

    #[test]
    fn expand_all_accepts_common_spellings() {
        for (raw, expected) in [("TRUE", true), ("1", true), ("yes", true), ("0", false), ("False", false)] {
            let cfg = config(&[("CAMPUS_EXPAND_ALL", raw)]).unwrap();
            assert_eq!(cfg.expand_all, expected, "{raw}");
        }
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = config(&[("CAMPUS_API_TOKEN", "  "), ("CAMPUS_COLLEGE_ID", "")]).unwrap();
        assert_eq!(cfg.api_token, None);
        assert_eq!(cfg.user.college_id, None);
    }
}
