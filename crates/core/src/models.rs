//! Academic entity models as the backend returns them.
//!
//! Records arrive with inconsistent field naming (`departmentId` on some
//! endpoints, `department_id` on others) and occasionally with ids encoded
//! as strings. Both are normalized here, at deserialization, so every
//! consumer sees one canonical shape. Serialization always uses camelCase.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::DbId;

/// A department of a college.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(deserialize_with = "de_id")]
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default, alias = "college_id", deserialize_with = "de_opt_id")]
    pub college_id: Option<DbId>,
    #[serde(default, alias = "hod_id", deserialize_with = "de_opt_id")]
    pub hod_id: Option<DbId>,
}

/// Programme level of a course. Unknown strings are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CourseType {
    Undergraduate,
    Postgraduate,
    Diploma,
    Certificate,
    Doctorate,
    Other(String),
}

impl CourseType {
    pub fn as_str(&self) -> &str {
        match self {
            CourseType::Undergraduate => "undergraduate",
            CourseType::Postgraduate => "postgraduate",
            CourseType::Diploma => "diploma",
            CourseType::Certificate => "certificate",
            CourseType::Doctorate => "doctorate",
            CourseType::Other(s) => s,
        }
    }

    /// Heading used for the course-type level of the tree.
    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => "Unspecified".to_string(),
        }
    }
}

impl From<String> for CourseType {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "undergraduate" | "ug" => CourseType::Undergraduate,
            "postgraduate" | "pg" => CourseType::Postgraduate,
            "diploma" => CourseType::Diploma,
            "certificate" => CourseType::Certificate,
            "doctorate" | "phd" => CourseType::Doctorate,
            _ => CourseType::Other(s),
        }
    }
}

impl From<&str> for CourseType {
    fn from(s: &str) -> Self {
        CourseType::from(s.to_string())
    }
}

impl From<CourseType> for String {
    fn from(t: CourseType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for CourseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(deserialize_with = "de_id")]
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(rename = "type", alias = "courseType", alias = "course_type")]
    pub course_type: CourseType,
    #[serde(default, alias = "college_id", deserialize_with = "de_opt_id")]
    pub college_id: Option<DbId>,
    #[serde(default, alias = "department_id", deserialize_with = "de_opt_id")]
    pub department_id: Option<DbId>,
    #[serde(default = "default_true", alias = "is_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYear {
    #[serde(deserialize_with = "de_id")]
    pub id: DbId,
    #[serde(alias = "course_id", deserialize_with = "de_id")]
    pub course_id: DbId,
    #[serde(alias = "year_number")]
    pub year_number: u32,
    #[serde(default, alias = "year_name")]
    pub year_name: String,
    #[serde(default = "default_true", alias = "is_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

impl SectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionStatus::Active => "active",
            SectionStatus::Inactive => "inactive",
            SectionStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(deserialize_with = "de_id")]
    pub id: DbId,
    pub name: String,
    #[serde(alias = "course_id", deserialize_with = "de_id")]
    pub course_id: DbId,
    /// Denormalized copy of the owning course's department.
    #[serde(default, alias = "department_id", deserialize_with = "de_opt_id")]
    pub department_id: Option<DbId>,
    #[serde(alias = "academic_year_id", deserialize_with = "de_id")]
    pub academic_year_id: DbId,
    #[serde(alias = "max_students")]
    pub max_students: u32,
    #[serde(default, alias = "current_students")]
    pub current_students: u32,
    #[serde(default)]
    pub status: SectionStatus,
    #[serde(default, alias = "academic_session")]
    pub academic_session: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(DbId),
    Text(String),
}

impl RawId {
    fn into_id<E: serde::de::Error>(self) -> Result<DbId, E> {
        match self {
            RawId::Int(id) => Ok(id),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid id: {s:?}"))),
        }
    }
}

/// Accept an id encoded either as a JSON number or a numeric string.
fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DbId, D::Error> {
    RawId::deserialize(deserializer)?.into_id()
}

/// Like [`de_id`], but `null` and `""` map to `None`.
fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DbId>, D::Error> {
    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(raw) => raw.into_id().map(Some),
    }
}
