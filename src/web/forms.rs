//! URL-encoded form payloads submitted by the web UI.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{CourseDraft, TaskDraft, TaskStatus};

/// Layout of `<input type="datetime-local">` values. Read as UTC.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn format_due_input(ts: &DateTime<Utc>) -> String {
    ts.format(DUE_DATE_FORMAT).to_string()
}

#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: String,
    pub priority: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub course_id: String,
}

impl TaskForm {
    pub fn into_draft(self) -> Result<TaskDraft, AppError> {
        let due_date = NaiveDateTime::parse_from_str(self.due_date.trim(), DUE_DATE_FORMAT)
            .map_err(|_| AppError::BadRequest("Invalid due date format".to_string()))?
            .and_utc();

        let priority = self
            .priority
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::BadRequest("Priority must be a number".to_string()))?;

        let status = match self.status.trim() {
            "" => None,
            raw => Some(
                raw.parse::<TaskStatus>()
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            ),
        };

        let course_id = match self.course_id.trim() {
            "" => None,
            raw => Some(
                raw.parse::<i64>()
                    .map_err(|_| AppError::BadRequest("Invalid course".to_string()))?,
            ),
        };

        Ok(TaskDraft {
            title: self.title,
            description: self.description,
            due_date,
            priority,
            status,
            course_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CourseForm {
    pub name: String,
    #[serde(default)]
    pub professor: String,
}

impl From<CourseForm> for CourseDraft {
    fn from(form: CourseForm) -> Self {
        CourseDraft {
            name: form.name,
            professor: form.professor,
        }
    }
}
