//! In-process stand-in for the LMS backend.
//!
//! Serves the academic-structure endpoints from fixed fixtures on an
//! ephemeral port and records every request so tests can assert on what was
//! (or was not) sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use campus_client::api::ApiService;

/// Behaviour switches and request log.
#[derive(Default)]
pub struct Backend {
    pub fail_sections: AtomicBool,
    pub slow_sections: AtomicBool,
    pub reject_courses: AtomicBool,
    requests: Mutex<Vec<String>>,
    bodies: Mutex<Vec<(String, Value)>>,
    queries: Mutex<Vec<HashMap<String, String>>>,
    authorization: Mutex<Option<String>>,
}

impl Backend {
    fn record(&self, line: impl Into<String>) {
        self.requests.lock().unwrap().push(line.into());
    }

    fn record_body(&self, line: &str, body: &Value) {
        self.record(line);
        self.bodies
            .lock()
            .unwrap()
            .push((line.to_string(), body.clone()));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, line: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == line).count()
    }

    /// Body of the last request matching `line`.
    pub fn last_body(&self, line: &str) -> Option<Value> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(l, _)| l == line)
            .map(|(_, b)| b.clone())
    }

    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.queries.lock().unwrap().clone()
    }

    /// `Authorization` header of the last department list request.
    pub fn authorization(&self) -> Option<String> {
        self.authorization.lock().unwrap().clone()
    }
}

type Shared = State<Arc<Backend>>;

async fn departments(
    State(backend): Shared,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Json<Value> {
    backend.record("GET /departments");
    backend.queries.lock().unwrap().push(q);
    *backend.authorization.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({
        "success": true,
        "data": [
            {"id": 1, "name": "Computer Science", "code": "CS", "collegeId": 1},
            {"id": 2, "name": "Mathematics", "code": "MA", "college_id": 1},
            {"id": 3, "name": "Fine Arts", "code": "FA", "collegeId": 1}
        ]
    }))
}

async fn college_departments(State(backend): Shared, Path(college_id): Path<i64>) -> Json<Value> {
    backend.record(format!("GET /colleges/{college_id}/departments"));
    Json(json!([
        {"id": 1, "name": "Computer Science", "code": "CS", "collegeId": college_id},
        {"id": 2, "name": "Mathematics", "code": "MA", "collegeId": college_id}
    ]))
}

async fn courses(State(backend): Shared) -> Json<Value> {
    backend.record("GET /courses");
    Json(json!([
        {"id": 10, "name": "B.Tech CS", "code": "BTCS", "type": "undergraduate", "departmentId": 1, "collegeId": 1},
        {"id": 20, "name": "B.Sc Maths", "code": "BSM", "type": "undergraduate", "department_id": "2", "college_id": 1}
    ]))
}

async fn academic_years(State(backend): Shared) -> Json<Value> {
    backend.record("GET /academic-years");
    Json(json!({
        "data": [
            {"id": 100, "courseId": 10, "yearNumber": 1, "yearName": "First Year"},
            {"id": 200, "course_id": 20, "year_number": 1, "year_name": "First Year"}
        ]
    }))
}

async fn sections(State(backend): Shared) -> Response {
    backend.record("GET /sections");
    if backend.slow_sections.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }
    if backend.fail_sections.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Database unavailable"})),
        )
            .into_response();
    }
    Json(json!([
        {"id": 1000, "name": "A", "courseId": 10, "departmentId": 1, "academicYearId": 100, "maxStudents": 60, "currentStudents": 40, "status": "active"},
        {"id": 2000, "name": "A", "course_id": 20, "department_id": 2, "academic_year_id": 200, "max_students": 40, "status": "active"}
    ]))
    .into_response()
}

fn duplicate_course_code() -> Response {
    (
        StatusCode::CONFLICT,
        Json(json!({"message": "Course code already exists"})),
    )
        .into_response()
}

async fn create_course(State(backend): Shared, Json(body): Json<Value>) -> Response {
    backend.record_body("POST /courses", &body);
    if backend.reject_courses.load(Ordering::SeqCst) {
        return duplicate_course_code();
    }
    let mut created = body;
    created["id"] = json!(30);
    (StatusCode::CREATED, Json(json!({ "data": created }))).into_response()
}

async fn update_course(
    State(backend): Shared,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    backend.record_body(&format!("PUT /courses/{id}"), &body);
    if backend.reject_courses.load(Ordering::SeqCst) {
        return duplicate_course_code();
    }
    let mut updated = body;
    updated["id"] = json!(id);
    Json(updated).into_response()
}

async fn create_section(State(backend): Shared, Json(body): Json<Value>) -> Json<Value> {
    backend.record_body("POST /sections", &body);
    let mut created = body;
    created["id"] = json!(3000);
    Json(created)
}

async fn update_section(
    State(backend): Shared,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    backend.record_body(&format!("PUT /sections/{id}"), &body);
    let mut updated = body;
    updated["id"] = json!(id);
    Json(updated)
}

async fn create_years(
    State(backend): Shared,
    Path(course_id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let line = format!("POST /courses/{course_id}/academic-years");
    backend.record_body(&line, &body);
    let from = body["fromYear"].as_i64().unwrap_or_default();
    let to = body["toYear"].as_i64().unwrap_or_default();
    let years: Vec<Value> = (1..=(to - from))
        .map(|n| {
            json!({
                "id": 500 + n,
                "courseId": course_id,
                "yearNumber": n,
                "yearName": format!("Year {n}")
            })
        })
        .collect();
    Json(json!({ "data": years }))
}

async fn invitations(State(backend): Shared, Json(body): Json<Value>) -> StatusCode {
    backend.record_body("POST /invitations", &body);
    StatusCode::CREATED
}

async fn pending_registrations(
    State(backend): Shared,
    Query(q): Query<HashMap<String, String>>,
) -> Json<Value> {
    backend.record("GET /registrations");
    backend.queries.lock().unwrap().push(q);
    Json(json!({
        "data": [
            {"id": 77, "name": "Asha", "email": "asha@college.edu", "role": "student",
             "collegeId": 1, "departmentId": 1, "status": "pending",
             "createdAt": "2026-09-01T08:30:00Z"},
            {"id": 78, "name": "Ravi", "email": "ravi@college.edu", "role": "staff",
             "college_id": 1, "department_id": 2, "status": "pending"}
        ]
    }))
}

async fn decide_registration(
    State(backend): Shared,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    backend.record_body(&format!("PUT /registrations/{id}"), &body);
    Json(json!({
        "id": id,
        "name": "Asha",
        "email": "asha@college.edu",
        "role": "student",
        "collegeId": 1,
        "departmentId": 1,
        "status": body["status"],
        "rejectionReason": body.get("reason")
    }))
}

pub fn router(backend: Arc<Backend>) -> Router {
    let api = Router::new()
        .route("/departments", get(departments))
        .route("/colleges/{college_id}/departments", get(college_departments))
        .route("/courses", get(courses).post(create_course))
        .route("/courses/{id}", put(update_course))
        .route("/courses/{id}/academic-years", post(create_years))
        .route("/academic-years", get(academic_years))
        .route("/sections", get(sections).post(create_section))
        .route("/sections/{id}", put(update_section))
        .route("/invitations", post(invitations))
        .route("/registrations", get(pending_registrations))
        .route("/registrations/{id}", put(decide_registration))
        .with_state(backend);
    Router::new().nest("/api", api)
}

/// Start the fake backend and return an [`ApiService`] pointed at it.
pub async fn spawn(backend: Backend) -> (ApiService, Arc<Backend>) {
    let backend = Arc::new(backend);
    let app = router(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (ApiService::new(format!("http://{addr}/api")), backend)
}
