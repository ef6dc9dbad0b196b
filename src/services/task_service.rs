use std::sync::Arc;

use chrono::{DateTime, Datelike, SubsecRound, Utc};
use tracing::{debug, warn};

use crate::models::{MAX_PRIORITY, MIN_PRIORITY, Task, TaskDraft};
use crate::repository::{CourseRepository, TaskRepository};
use crate::services::{ServiceError, ServiceResult, ValidationError, next_updated_at, now};

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>, courses: Arc<dyn CourseRepository>) -> Self {
        Self { tasks, courses }
    }

    /// Validates `draft`, stamps both timestamps and stores it.
    ///
    /// Status defaults to `pending`; a `course_id` of `0` is treated as no course.
    pub async fn create_task(&self, draft: TaskDraft) -> ServiceResult<Task> {
        validate(&draft)?;
        let course_id = normalize_course_id(draft.course_id);
        self.ensure_course(course_id).await?;

        let now = now();
        let mut task = Task {
            id: 0,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date.trunc_subsecs(0),
            priority: draft.priority,
            status: draft.status.unwrap_or_default(),
            course_id,
            created_at: now,
            updated_at: now,
        };
        task.id = self.tasks.create(&task).await?;

        debug!("created task {} ({:?})", task.id, task.title);
        Ok(task)
    }

    /// Replaces the fields of task `id`, keeping its `created_at`.
    ///
    /// A draft without a status keeps the stored status.
    pub async fn update_task(&self, id: i64, draft: TaskDraft) -> ServiceResult<Task> {
        validate(&draft)?;

        let existing = self
            .tasks
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::TaskNotFound(id))?;

        let course_id = normalize_course_id(draft.course_id);
        self.ensure_course(course_id).await?;

        let task = Task {
            id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date.trunc_subsecs(0),
            priority: draft.priority,
            status: draft.status.unwrap_or(existing.status),
            course_id,
            created_at: existing.created_at,
            updated_at: next_updated_at(existing.updated_at),
        };

        if !self.tasks.update(&task).await? {
            return Err(ServiceError::TaskNotFound(id));
        }

        debug!("updated task {}", id);
        Ok(task)
    }

    pub async fn get_task(&self, id: i64) -> ServiceResult<Task> {
        self.tasks
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::TaskNotFound(id))
    }

    /// Every task, soonest due date first.
    pub async fn get_all_tasks(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.tasks.get_all().await?)
    }

    /// Tasks attached to an existing course, soonest due date first.
    pub async fn get_tasks_for_course(&self, course_id: i64) -> ServiceResult<Vec<Task>> {
        if self.courses.get_by_id(course_id).await?.is_none() {
            return Err(ServiceError::CourseNotFound(course_id));
        }
        Ok(self.tasks.get_by_course_id(course_id).await?)
    }

    pub async fn delete_task(&self, id: i64) -> ServiceResult<()> {
        if self.tasks.get_by_id(id).await?.is_none() {
            return Err(ServiceError::TaskNotFound(id));
        }
        if !self.tasks.delete(id).await? {
            return Err(ServiceError::TaskNotFound(id));
        }

        debug!("deleted task {}", id);
        Ok(())
    }

    async fn ensure_course(&self, course_id: Option<i64>) -> ServiceResult<()> {
        let Some(course_id) = course_id else {
            return Ok(());
        };
        if self.courses.get_by_id(course_id).await?.is_none() {
            warn!("rejecting task: course {} does not exist", course_id);
            return Err(ValidationError::UnknownCourse(course_id).into());
        }
        Ok(())
    }
}

fn normalize_course_id(course_id: Option<i64>) -> Option<i64> {
    course_id.filter(|id| *id != 0)
}

// Stored dates are four-digit-year RFC 3339 text.
const MAX_DUE_YEAR: i32 = 9999;

fn due_date_accepted(due_date: DateTime<Utc>) -> bool {
    due_date > now() && due_date.year() <= MAX_DUE_YEAR
}

fn validate(draft: &TaskDraft) -> Result<(), ValidationError> {
    let result = if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&draft.priority) {
        Err(ValidationError::InvalidPriority(draft.priority))
    } else if !due_date_accepted(draft.due_date.trunc_subsecs(0)) {
        Err(ValidationError::InvalidDueDate)
    } else if draft.title.trim().is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(())
    };

    if let Err(e) = &result {
        warn!("rejecting task: {}", e);
    }
    result
}
