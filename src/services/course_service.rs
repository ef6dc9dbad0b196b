use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{Course, CourseDraft};
use crate::repository::CourseRepository;
use crate::services::{ServiceError, ServiceResult, ValidationError, next_updated_at, now};

#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
}

impl CourseService {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn create_course(&self, draft: CourseDraft) -> ServiceResult<Course> {
        validate(&draft)?;

        let now = now();
        let mut course = Course {
            id: 0,
            name: draft.name,
            professor: draft.professor,
            created_at: now,
            updated_at: now,
        };
        course.id = self.courses.create(&course).await?;

        debug!("created course {} ({:?})", course.id, course.name);
        Ok(course)
    }

    pub async fn update_course(&self, id: i64, draft: CourseDraft) -> ServiceResult<Course> {
        validate(&draft)?;

        let existing = self
            .courses
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::CourseNotFound(id))?;

        let course = Course {
            id,
            name: draft.name,
            professor: draft.professor,
            created_at: existing.created_at,
            updated_at: next_updated_at(existing.updated_at),
        };

        if !self.courses.update(&course).await? {
            return Err(ServiceError::CourseNotFound(id));
        }

        debug!("updated course {}", id);
        Ok(course)
    }

    pub async fn get_course(&self, id: i64) -> ServiceResult<Course> {
        self.courses
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::CourseNotFound(id))
    }

    /// Every course, by name.
    pub async fn get_all_courses(&self) -> ServiceResult<Vec<Course>> {
        Ok(self.courses.get_all().await?)
    }

    /// Deletes the course only; tasks that reference it keep their `course_id`.
    pub async fn delete_course(&self, id: i64) -> ServiceResult<()> {
        if self.courses.get_by_id(id).await?.is_none() {
            return Err(ServiceError::CourseNotFound(id));
        }
        if !self.courses.delete(id).await? {
            return Err(ServiceError::CourseNotFound(id));
        }

        debug!("deleted course {}", id);
        Ok(())
    }
}

fn validate(draft: &CourseDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        warn!("rejecting course: empty name");
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}
