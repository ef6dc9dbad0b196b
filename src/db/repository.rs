use async_trait::async_trait;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::models::{Course, Task};
use crate::repository::{CourseRepository, RepositoryError, RepositoryResult, TaskRepository};

/// Fixed-width RFC 3339 in UTC, so text order equals time order.
///
/// Only years 0 through 9999 fit that layout; anything else is refused
/// rather than written in a form [`parse_timestamp`] cannot read.
pub fn format_timestamp(ts: &DateTime<Utc>) -> RepositoryResult<String> {
    if !(0..=9999).contains(&ts.year()) {
        return Err(RepositoryError::Unrepresentable(format!(
            "timestamp {ts} is outside years 0000-9999"
        )));
    }
    Ok(ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn stored_timestamp(
    entity: &'static str,
    id: i64,
    column: &str,
    value: &str,
) -> RepositoryResult<DateTime<Utc>> {
    parse_timestamp(value).ok_or_else(|| RepositoryError::CorruptRecord {
        entity,
        id,
        detail: format!("{column} is not a valid timestamp: {value:?}"),
    })
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: Option<String>,
    due_date: String,
    priority: i64,
    status: String,
    course_id: Option<i64>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = RepositoryError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| RepositoryError::CorruptRecord {
                entity: "task",
                id: row.id,
                detail: format!("{e}"),
            })?;

        Ok(Task {
            id: row.id,
            due_date: stored_timestamp("task", row.id, "due_date", &row.due_date)?,
            created_at: stored_timestamp("task", row.id, "created_at", &row.created_at)?,
            updated_at: stored_timestamp("task", row.id, "updated_at", &row.updated_at)?,
            title: row.title,
            description: row.description.unwrap_or_default(),
            priority: row.priority,
            status,
            course_id: row.course_id,
        })
    }
}

#[derive(Debug, FromRow)]
struct CourseRow {
    id: i64,
    name: String,
    professor: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<CourseRow> for Course {
    type Error = RepositoryError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        Ok(Course {
            id: row.id,
            created_at: stored_timestamp("course", row.id, "created_at", &row.created_at)?,
            updated_at: stored_timestamp("course", row.id, "updated_at", &row.updated_at)?,
            name: row.name,
            professor: row.professor,
        })
    }
}

fn into_entities<R, E>(rows: Vec<R>) -> RepositoryResult<Vec<E>>
where
    E: TryFrom<R, Error = RepositoryError>,
{
    rows.into_iter().map(E::try_from).collect()
}

const TASK_COLUMNS: &str =
    "id, title, description, due_date, priority, status, course_id, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteTaskRepository {
    db: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY due_date ASC, id ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        into_entities(rows)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(Task::try_from).transpose()
    }

    async fn get_by_course_id(&self, course_id: i64) -> RepositoryResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE course_id = ? ORDER BY due_date ASC, id ASC"
        ))
        .bind(course_id)
        .fetch_all(&self.db)
        .await?;

        into_entities(rows)
    }

    async fn create(&self, task: &Task) -> RepositoryResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO tasks
                (title, description, due_date, priority, status, course_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(format_timestamp(&task.due_date)?)
        .bind(task.priority)
        .bind(task.status.as_str())
        .bind(task.course_id)
        .bind(format_timestamp(&task.created_at)?)
        .bind(format_timestamp(&task.updated_at)?)
        .execute(&self.db)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, task: &Task) -> RepositoryResult<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?1,
                description = ?2,
                due_date = ?3,
                priority = ?4,
                status = ?5,
                course_id = ?6,
                updated_at = ?7
            WHERE id = ?8
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(format_timestamp(&task.due_date)?)
        .bind(task.priority)
        .bind(task.status.as_str())
        .bind(task.course_id)
        .bind(format_timestamp(&task.updated_at)?)
        .bind(task.id)
        .execute(&self.db)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let affected = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}

#[derive(Clone)]
pub struct SqliteCourseRepository {
    db: SqlitePool,
}

impl SqliteCourseRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseRepository for SqliteCourseRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            "SELECT id, name, professor, created_at, updated_at FROM courses ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        into_entities(rows)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(
            "SELECT id, name, professor, created_at, updated_at FROM courses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(Course::try_from).transpose()
    }

    async fn create(&self, course: &Course) -> RepositoryResult<i64> {
        let result = sqlx::query(
            "INSERT INTO courses (name, professor, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&course.name)
        .bind(&course.professor)
        .bind(format_timestamp(&course.created_at)?)
        .bind(format_timestamp(&course.updated_at)?)
        .execute(&self.db)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, course: &Course) -> RepositoryResult<bool> {
        let affected = sqlx::query(
            "UPDATE courses SET name = ?1, professor = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(&course.name)
        .bind(&course.professor)
        .bind(format_timestamp(&course.updated_at)?)
        .bind(course.id)
        .execute(&self.db)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let affected = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}
