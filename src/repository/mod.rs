//! Storage gateway ports.
//!
//! Services only ever talk to these traits. Lookups report absence as
//! `Ok(None)`, and `update`/`delete` report a missing row as `Ok(false)`;
//! everything else is a [`RepositoryError`].

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Course, Task};

pub use memory::{InMemoryCourseRepository, InMemoryTaskRepository};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back to an entity.
    #[error("corrupt {entity} record {id}: {detail}")]
    CorruptRecord {
        entity: &'static str,
        id: i64,
        detail: String,
    },

    /// A value has no representation in the stored format.
    #[error("cannot store value: {0}")]
    Unrepresentable(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All tasks, ascending by due date.
    async fn get_all(&self) -> RepositoryResult<Vec<Task>>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Task>>;

    /// Tasks referencing `course_id`, ascending by due date.
    async fn get_by_course_id(&self, course_id: i64) -> RepositoryResult<Vec<Task>>;

    /// Inserts `task` (its `id` is ignored) and returns the assigned identity.
    async fn create(&self, task: &Task) -> RepositoryResult<i64>;

    /// Rewrites every column except `id` and `created_at`.
    async fn update(&self, task: &Task) -> RepositoryResult<bool>;

    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// All courses, ascending by name.
    async fn get_all(&self) -> RepositoryResult<Vec<Course>>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Course>>;

    async fn create(&self, course: &Course) -> RepositoryResult<i64>;

    async fn update(&self, course: &Course) -> RepositoryResult<bool>;

    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
}
