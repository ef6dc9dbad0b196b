use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest accepted task priority.
pub const MIN_PRIORITY: i64 = 1;
/// Highest accepted task priority.
pub const MAX_PRIORITY: i64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A persisted task. `id` is assigned by storage and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: i64,
    pub status: TaskStatus,
    pub course_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied task fields, used for both creation and full replacement.
///
/// A `course_id` of `0` means "no course", same as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: i64,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub course_id: Option<i64>,
}

/// Partial update used by `PATCH /api/tasks/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<i64>,
    pub status: Option<TaskStatus>,
    pub course_id: Option<i64>,
}

impl UpdateTaskRequest {
    /// Overlays the provided fields onto the stored task.
    pub fn merge_onto(self, current: &Task) -> TaskDraft {
        TaskDraft {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            due_date: self.due_date.unwrap_or(current.due_date),
            priority: self.priority.unwrap_or(current.priority),
            status: Some(self.status.unwrap_or(current.status)),
            course_id: self.course_id.or(current.course_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn status_text_matches_storage_values() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
        assert_eq!(
            "done".parse::<TaskStatus>(),
            Err(UnknownStatus("done".to_string()))
        );
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let now = Utc::now();
        let task = Task {
            id: 7,
            title: "HW1".to_string(),
            description: "chapter 3".to_string(),
            due_date: now + Duration::days(1),
            priority: 3,
            status: TaskStatus::InProgress,
            course_id: Some(2),
            created_at: now,
            updated_at: now,
        };

        let draft = UpdateTaskRequest {
            title: Some("HW1 (revised)".to_string()),
            ..Default::default()
        }
        .merge_onto(&task);

        assert_eq!(draft.title, "HW1 (revised)");
        assert_eq!(draft.description, "chapter 3");
        assert_eq!(draft.due_date, task.due_date);
        assert_eq!(draft.priority, 3);
        assert_eq!(draft.status, Some(TaskStatus::InProgress));
        assert_eq!(draft.course_id, Some(2));
    }
}
