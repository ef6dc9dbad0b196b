use std::sync::Arc;

use minijinja::Environment;
use sqlx::SqlitePool;

use crate::db::{SqliteCourseRepository, SqliteTaskRepository};
use crate::services::{CourseService, TaskService};
use crate::web;

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tasks: TaskService,
    pub courses: CourseService,
    pub templates: Arc<Environment<'static>>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Result<Self, minijinja::Error> {
        let task_repo = Arc::new(SqliteTaskRepository::new(db.clone()));
        let course_repo = Arc::new(SqliteCourseRepository::new(db.clone()));

        Ok(Self {
            tasks: TaskService::new(task_repo, course_repo.clone()),
            courses: CourseService::new(course_repo),
            templates: Arc::new(web::templates()?),
            db,
        })
    }
}
