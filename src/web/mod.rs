//! Server-rendered HTML pages.

pub mod forms;

use std::collections::HashMap;

use axum::Form;
use axum::Router;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use minijinja::{Environment, context};
use serde::Serialize;

use crate::error::AppError;
use crate::models::{Course, Task, TaskStatus};
use crate::state::AppState;

use forms::{CourseForm, TaskForm, format_due_input};

/// Builds the template environment from the pages compiled into the binary.
pub fn templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("base.html", include_str!("../../templates/base.html"))?;
    env.add_template("index.html", include_str!("../../templates/index.html"))?;
    env.add_template("task_form.html", include_str!("../../templates/task_form.html"))?;
    env.add_template("courses.html", include_str!("../../templates/courses.html"))?;
    env.add_template("course_form.html", include_str!("../../templates/course_form.html"))?;
    Ok(env)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/tasks", post(create_task))
        .route("/tasks/new", get(new_task_form))
        .route("/tasks/{id}", post(update_task))
        .route("/tasks/{id}/edit", get(edit_task_form))
        .route("/tasks/{id}/delete", post(delete_task))
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/new", get(new_course_form))
        .route("/courses/{id}/delete", post(delete_course))
}

#[derive(Serialize)]
struct TaskView<'a> {
    #[serde(flatten)]
    task: &'a Task,
    due_input: String,
    course_name: Option<&'a str>,
}

fn task_views<'a>(tasks: &'a [Task], courses: &'a [Course]) -> Vec<TaskView<'a>> {
    let names: HashMap<i64, &str> = courses.iter().map(|c| (c.id, c.name.as_str())).collect();
    tasks
        .iter()
        .map(|task| TaskView {
            task,
            due_input: format_due_input(&task.due_date),
            course_name: task.course_id.and_then(|id| names.get(&id).copied()),
        })
        .collect()
}

fn render(state: &AppState, name: &str, ctx: minijinja::Value) -> Result<Html<String>, AppError> {
    let page = state.templates.get_template(name)?.render(ctx)?;
    Ok(Html(page))
}

fn statuses() -> Vec<&'static str> {
    TaskStatus::ALL.iter().map(|s| s.as_str()).collect()
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let tasks = state.tasks.get_all_tasks().await?;
    let courses = state.courses.get_all_courses().await?;

    render(
        &state,
        "index.html",
        context! {
            tasks => task_views(&tasks, &courses),
            courses => courses,
        },
    )
}

async fn new_task_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let courses = state.courses.get_all_courses().await?;
    render(
        &state,
        "task_form.html",
        context! { courses => courses, statuses => statuses() },
    )
}

async fn create_task(
    State(state): State<AppState>,
    Form(form): Form<TaskForm>,
) -> Result<Redirect, AppError> {
    state.tasks.create_task(form.into_draft()?).await?;
    Ok(Redirect::to("/"))
}

async fn edit_task_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let task = state.tasks.get_task(id).await?;
    let courses = state.courses.get_all_courses().await?;
    let view = task_views(std::slice::from_ref(&task), &courses);

    render(
        &state,
        "task_form.html",
        context! {
            task => view.first(),
            courses => courses,
            statuses => statuses(),
        },
    )
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<TaskForm>,
) -> Result<Redirect, AppError> {
    state.tasks.update_task(id, form.into_draft()?).await?;
    Ok(Redirect::to("/"))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.tasks.delete_task(id).await?;
    Ok(Redirect::to("/"))
}

async fn list_courses(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let courses = state.courses.get_all_courses().await?;
    render(&state, "courses.html", context! { courses => courses })
}

async fn new_course_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, "course_form.html", context! {})
}

async fn create_course(
    State(state): State<AppState>,
    Form(form): Form<CourseForm>,
) -> Result<Redirect, AppError> {
    state.courses.create_course(form.into()).await?;
    Ok(Redirect::to("/courses"))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.courses.delete_course(id).await?;
    Ok(Redirect::to("/courses"))
}
