//! Validation and persistence services.
//!
//! Every check runs before the first mutating storage call, so a rejected
//! request never leaves a partial write behind.

pub mod course_service;
pub mod task_service;

use chrono::{DateTime, SubsecRound, Utc};
use thiserror::Error;

use crate::repository::RepositoryError;

pub use course_service::CourseService;
pub use task_service::TaskService;

/// Business-rule violations. The caller can fix the input and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task priority must be between 1 and 5, got {0}")]
    InvalidPriority(i64),

    #[error("due date must be in the future")]
    InvalidDueDate,

    #[error("course name cannot be empty")]
    EmptyName,

    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error("referenced course {0} does not exist")]
    UnknownCourse(i64),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task {0} not found")]
    TaskNotFound(i64),

    #[error("course {0} not found")]
    CourseNotFound(i64),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::TaskNotFound(_) | ServiceError::CourseNotFound(_)
        )
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Current time at the precision the store keeps.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Refreshed `updated_at` that never moves behind the previous one.
pub(crate) fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    now().max(previous)
}
