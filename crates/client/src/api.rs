//! REST API client for the LMS backend.
//!
//! Wraps the academic-structure endpoints (departments, courses, academic
//! years, sections), invitations and registration decisions using
//! [`reqwest`]. Records are normalized into the `campus_core` models as
//! they are deserialized.

use campus_core::approval::{Decision, Registration};
use campus_core::error::CoreError;
use campus_core::forms::{AcademicYearPayload, CoursePayload, SectionPayload};
use campus_core::invitation::Invitation;
use campus_core::models::{AcademicYear, Course, Department, Section};
use campus_core::types::DbId;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::envelope::{ItemEnvelope, ListEnvelope};

/// HTTP client for a single LMS backend.
#[derive(Debug, Clone)]
pub struct ApiService {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

/// Errors from the REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, or an
    /// undecodable body).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Rejected locally before any request was made.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    /// Message suitable for a toast or an inline form error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Request(_) => "Could not reach the server. Please try again.".to_string(),
            ApiError::Api { status, body } => extract_message(body)
                .unwrap_or_else(|| format!("Request failed with status {status}")),
            ApiError::Core(err) => err.user_message(),
        }
    }
}

/// Pull `message` or `error` out of a JSON error body.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
}

impl ApiService {
    /// Create a new API client.
    ///
    /// * `api_url` - Base URL including any path prefix, e.g.
    ///   `http://host:5000/api`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Build a client with the configured timeout and bearer token.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let service = Self::with_client(client, config.api_url.clone());
        Ok(match &config.api_token {
            Some(token) => service.with_token(token.clone()),
            None => service,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- academic structure ----

    /// `GET /departments`, optionally restricted to a college.
    pub async fn get_departments(
        &self,
        college_id: Option<DbId>,
    ) -> Result<Vec<Department>, ApiError> {
        self.get_list("/departments", college_query(college_id)).await
    }

    /// `GET /colleges/{id}/departments`, used to populate the department
    /// dropdown of the course form.
    pub async fn get_departments_by_college(
        &self,
        college_id: DbId,
    ) -> Result<Vec<Department>, ApiError> {
        self.get_list(&format!("/colleges/{college_id}/departments"), Vec::new())
            .await
    }

    /// `GET /courses`, optionally restricted to a college.
    pub async fn get_courses(&self, college_id: Option<DbId>) -> Result<Vec<Course>, ApiError> {
        self.get_list("/courses", college_query(college_id)).await
    }

    pub async fn get_academic_years(&self) -> Result<Vec<AcademicYear>, ApiError> {
        self.get_list("/academic-years", Vec::new()).await
    }

    pub async fn get_sections(&self) -> Result<Vec<Section>, ApiError> {
        self.get_list("/sections", Vec::new()).await
    }

    pub async fn create_course(&self, payload: &CoursePayload) -> Result<Course, ApiError> {
        self.send_item(Method::POST, "/courses", payload).await
    }

    pub async fn update_course(
        &self,
        course_id: DbId,
        payload: &CoursePayload,
    ) -> Result<Course, ApiError> {
        self.send_item(Method::PUT, &format!("/courses/{course_id}"), payload)
            .await
    }

    pub async fn create_section(&self, payload: &SectionPayload) -> Result<Section, ApiError> {
        self.send_item(Method::POST, "/sections", payload).await
    }

    pub async fn update_section(
        &self,
        section_id: DbId,
        payload: &SectionPayload,
    ) -> Result<Section, ApiError> {
        self.send_item(Method::PUT, &format!("/sections/{section_id}"), payload)
            .await
    }

    /// `POST /courses/{id}/academic-years`. Returns every year created for
    /// the range.
    pub async fn create_academic_years(
        &self,
        course_id: DbId,
        payload: &AcademicYearPayload,
    ) -> Result<Vec<AcademicYear>, ApiError> {
        let response = self
            .request(Method::POST, &format!("/courses/{course_id}/academic-years"))
            .json(payload)
            .send()
            .await?;
        let envelope: ListEnvelope<AcademicYear> = Self::parse_response(response).await?;
        Ok(envelope.into_vec())
    }

    // ---- invitations and registrations ----

    pub async fn send_invitation(&self, invitation: &Invitation) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, "/invitations")
            .json(invitation)
            .send()
            .await?;
        Self::check_status(response).await
    }

    pub async fn get_pending_registrations(&self) -> Result<Vec<Registration>, ApiError> {
        self.get_list("/registrations", vec![("status", "pending".to_string())])
            .await
    }

    pub async fn decide_registration(
        &self,
        registration_id: DbId,
        decision: &Decision,
    ) -> Result<Registration, ApiError> {
        self.send_item(
            Method::PUT,
            &format!("/registrations/{registration_id}"),
            decision,
        )
        .await
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.api_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(&'static str, String)>,
    ) -> Result<Vec<T>, ApiError> {
        let response = self.request(Method::GET, path).query(&query).send().await?;
        let envelope: ListEnvelope<T> = Self::parse_response(response).await?;
        let items = envelope.into_vec();
        tracing::debug!(path, count = items.len(), "Fetched list");
        Ok(items)
    }

    async fn send_item<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request(method, path).json(body).send().await?;
        let envelope: ItemEnvelope<T> = Self::parse_response(response).await?;
        Ok(envelope.into_inner())
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Api`] containing
    /// the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), body = %body, "API request failed");
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

fn college_query(college_id: Option<DbId>) -> Vec<(&'static str, String)> {
    college_id
        .map(|id| vec![("collegeId", id.to_string())])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_backend_message() {
        assert_eq!(
            extract_message(r#"{"message":"Course code already exists"}"#),
            Some("Course code already exists".to_string())
        );
        assert_eq!(
            extract_message(r#"{"error":"Forbidden"}"#),
            Some("Forbidden".to_string())
        );
        assert_eq!(extract_message("<html>"), None);
    }

    #[test]
    fn api_error_falls_back_to_status() {
        let err = ApiError::Api {
            status: 502,
            body: "Bad Gateway".into(),
        };
        assert_eq!(err.user_message(), "Request failed with status 502");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(
            ApiService::new("http://localhost:5000/api/").api_url(),
            "http://localhost:5000/api"
        );
    }
}
