//! JSON API under `/api`.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(replace_task).patch(update_task).delete(delete_task),
        )
        .route("/api/courses", get(list_courses).post(create_course))
        .route(
            "/api/courses/{id}",
            get(get_course).put(replace_course).delete(delete_course),
        )
        .route("/api/courses/{id}/tasks", get(list_course_tasks))
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state.tasks.get_all_tasks().await?;
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = state.tasks.create_task(req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, AppError> {
    let task = state.tasks.get_task(id).await?;
    Ok(Json(task))
}

async fn replace_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<TaskDraft>,
) -> Result<Json<Task>, AppError> {
    let task = state.tasks.update_task(id, req).await?;
    Ok(Json(task))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let current = state.tasks.get_task(id).await?;
    let task = state.tasks.update_task(id, req.merge_onto(&current)).await?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.tasks.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.courses.get_all_courses().await?;
    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<CourseDraft>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = state.courses.create_course(req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = state.courses.get_course(id).await?;
    Ok(Json(course))
}

async fn replace_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CourseDraft>,
) -> Result<Json<Course>, AppError> {
    let course = state.courses.update_course(id, req).await?;
    Ok(Json(course))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.courses.delete_course(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_course_tasks(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state.tasks.get_tasks_for_course(id).await?;
    Ok(Json(tasks))
}
