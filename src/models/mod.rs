pub mod course;
pub mod task;

pub use course::{Course, CourseDraft};
pub use task::{MAX_PRIORITY, MIN_PRIORITY, Task, TaskDraft, TaskStatus, UnknownStatus, UpdateTaskRequest};
