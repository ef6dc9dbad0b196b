use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use uni_tasks::db;
use uni_tasks::routes::router;
use uni_tasks::state::AppState;

async fn setup_app() -> Router {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to create test db");
    router(AppState::new(pool).expect("Failed to build app state"))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn due_in(hours: i64) -> String {
    (Utc::now() + Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[tokio::test]
async fn test_health() {
    let app = setup_app().await;
    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_task_crud_over_api() {
    let app = setup_app().await;

    let (status, course) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(json!({ "name": "Algorithms", "professor": "Dr. X" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let course_id = course["id"].as_i64().unwrap();

    let (status, task) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({
            "title": "HW1",
            "priority": 3,
            "due_date": due_in(24),
            "course_id": course_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "pending");
    let id = task["id"].as_i64().unwrap();

    let (status, patched) = send(
        &app,
        Method::PATCH,
        &format!("/api/tasks/{id}"),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["status"], "completed");
    assert_eq!(patched["title"], "HW1");
    assert_eq!(patched["created_at"], task["created_at"]);

    let (status, listed) = send(
        &app,
        Method::GET,
        &format!("/api/courses/{course_id}/tasks"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("task {id} not found"));
}

#[tokio::test]
async fn test_validation_errors_are_bad_requests() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "HW1", "priority": 7, "due_date": due_in(24) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("priority"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "HW1", "priority": 2, "due_date": due_in(-2) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "HW1", "priority": 2, "due_date": due_in(2), "course_id": 41 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(json!({ "name": "", "professor": "Dr. X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, tasks) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(tasks, json!([]));
    let (_, courses) = send(&app, Method::GET, "/api/courses", None).await;
    assert_eq!(courses, json!([]));
}

#[tokio::test]
async fn test_missing_entities_are_not_found() {
    let app = setup_app().await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/tasks/9",
        Some(json!({ "title": "HW1", "priority": 2, "due_date": due_in(2) })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/courses/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/courses/9/tasks", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_course_listing_is_sorted_and_replaceable() {
    let app = setup_app().await;

    for name in ["Physics", "Algorithms"] {
        send(&app, Method::POST, "/api/courses", Some(json!({ "name": name }))).await;
    }

    let (_, courses) = send(&app, Method::GET, "/api/courses", None).await;
    let names: Vec<&str> = courses
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Algorithms", "Physics"]);

    let physics = courses[1]["id"].as_i64().unwrap();
    let (status, replaced) = send(
        &app,
        Method::PUT,
        &format!("/api/courses/{physics}"),
        Some(json!({ "name": "Quantum Physics", "professor": "Dr. Q" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["professor"], "Dr. Q");
    assert_eq!(replaced["created_at"], courses[1]["created_at"]);
}

#[tokio::test]
async fn test_web_forms_redirect_and_render() {
    let app = setup_app().await;

    let form = |uri: &str, body: String| {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(form("/courses", "name=Algorithms&professor=Dr.+X".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/courses");

    let due = (Utc::now() + Duration::days(2)).format("%Y-%m-%dT%H:%M");
    let response = app
        .clone()
        .oneshot(form(
            "/tasks",
            format!("title=HW1&description=&due_date={due}&priority=3&course_id=1"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8(page.to_vec()).unwrap();
    assert!(page.contains("HW1"));
    assert!(page.contains("Algorithms"));

    let response = app
        .clone()
        .oneshot(Request::get("/tasks/1/edit").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(form(
            "/tasks",
            "title=HW2&due_date=tomorrow&priority=3".to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
