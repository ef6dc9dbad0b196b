//! In-memory storage gateways, used in tests in place of SQLite.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::models::{Course, Task};
use crate::repository::{CourseRepository, RepositoryError, RepositoryResult, TaskRepository};

#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Clone)]
struct Shared<T>(Arc<RwLock<Table<T>>>);

impl<T> Default for Shared<T> {
    fn default() -> Self {
        Self(Arc::new(RwLock::new(Table {
            next_id: 0,
            rows: BTreeMap::new(),
        })))
    }
}

impl<T> Shared<T> {
    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Table<T>>> {
        self.0
            .read()
            .map_err(|_| RepositoryError::Unavailable("in-memory table lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Table<T>>> {
        self.0
            .write()
            .map_err(|_| RepositoryError::Unavailable("in-memory table lock poisoned".to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    table: Shared<Task>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks.
    pub fn len(&self) -> usize {
        self.table.read().map(|t| t.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn by_due_date(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
    tasks
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<Task>> {
        let table = self.table.read()?;
        Ok(by_due_date(table.rows.values().cloned().collect()))
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Task>> {
        Ok(self.table.read()?.rows.get(&id).cloned())
    }

    async fn get_by_course_id(&self, course_id: i64) -> RepositoryResult<Vec<Task>> {
        let table = self.table.read()?;
        Ok(by_due_date(
            table
                .rows
                .values()
                .filter(|t| t.course_id == Some(course_id))
                .cloned()
                .collect(),
        ))
    }

    async fn create(&self, task: &Task) -> RepositoryResult<i64> {
        let mut table = self.table.write()?;
        let id = table.allocate_id();
        table.rows.insert(id, Task { id, ..task.clone() });
        Ok(id)
    }

    async fn update(&self, task: &Task) -> RepositoryResult<bool> {
        let mut table = self.table.write()?;
        match table.rows.get_mut(&task.id) {
            Some(stored) => {
                let created_at = stored.created_at;
                *stored = Task {
                    created_at,
                    ..task.clone()
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.table.write()?.rows.remove(&id).is_some())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCourseRepository {
    table: Shared<Course>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<Course>> {
        let table = self.table.read()?;
        let mut courses: Vec<Course> = table.rows.values().cloned().collect();
        courses.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(courses)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Course>> {
        Ok(self.table.read()?.rows.get(&id).cloned())
    }

    async fn create(&self, course: &Course) -> RepositoryResult<i64> {
        let mut table = self.table.write()?;
        let id = table.allocate_id();
        table.rows.insert(id, Course { id, ..course.clone() });
        Ok(id)
    }

    async fn update(&self, course: &Course) -> RepositoryResult<bool> {
        let mut table = self.table.write()?;
        match table.rows.get_mut(&course.id) {
            Some(stored) => {
                let created_at = stored.created_at;
                *stored = Course {
                    created_at,
                    ..course.clone()
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.table.write()?.rows.remove(&id).is_some())
    }
}
