// Task store: owns the task collection and persists every mutation

use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::models::{Priority, Task, TaskId, parse_date, validate_text};
use crate::persistence::{JsonFile, Persistence};

/// Authoritative owner of the task collection
///
/// The collection is loaded once, at construction. Each successful mutation
/// is followed by a full save; a failed save is returned to the caller but the
/// in-memory change is kept.
pub struct TaskStore<P: Persistence = JsonFile> {
    persistence: P,
    tasks: Vec<Task>,
    next_id: TaskId,
}

impl TaskStore<JsonFile> {
    /// Open the store backed by a JSON file at `path`
    pub fn open<T: AsRef<Path>>(path: T) -> Result<Self> {
        Self::with_persistence(JsonFile::new(path))
    }
}

impl<P: Persistence> TaskStore<P> {
    pub fn with_persistence(persistence: P) -> Result<Self> {
        let tasks = persistence.load()?;
        let next_id = match tasks.iter().map(|t| t.id).max() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or_else(|| {
                StoreError::corrupt(persistence.location(), format!("task id {} leaves no room for new ids", max))
            })?,
        };

        info!(count = tasks.len(), next_id, "Task store opened");

        Ok(Self {
            persistence,
            tasks,
            next_id,
        })
    }

    /// Create a task. `due_date`, when given, must be `YYYY-MM-DD`.
    pub fn add(&mut self, text: &str, priority: Priority, due_date: Option<&str>) -> Result<Task> {
        let due_date = due_date.map(parse_date).transpose()?;
        let task = Task::new(self.next_id, text, priority, due_date)?;
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Validation("No task ids left to assign".to_string()))?;

        self.next_id = next_id;
        self.tasks.push(task.clone());
        debug!(id = task.id, "Task added");

        self.persist()?;
        Ok(task)
    }

    /// Replace the text of a task
    pub fn update(&mut self, id: TaskId, new_text: &str) -> Result<Task> {
        let index = self.index_of(id)?;
        let text = validate_text(new_text)?;

        let task = &mut self.tasks[index];
        task.text = text;
        let updated = task.clone();
        debug!(id, "Task text updated");

        self.persist()?;
        Ok(updated)
    }

    /// Flip the completion flag of a task
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<Task> {
        let index = self.index_of(id)?;

        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        let updated = task.clone();
        debug!(id, completed = updated.completed, "Task completion toggled");

        self.persist()?;
        Ok(updated)
    }

    pub fn delete(&mut self, id: TaskId) -> Result<()> {
        let index = self.index_of(id)?;

        self.tasks.remove(index);
        debug!(id, "Task deleted");

        self.persist()
    }

    /// All tasks in creation order
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn index_of(&self, id: TaskId) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn persist(&self) -> Result<()> {
        self.persistence.save(&self.tasks).inspect_err(|e| {
            warn!(error = %e, "Failed to save tasks; in-memory changes kept");
        })
    }
}
