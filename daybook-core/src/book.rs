//! TaskBook: the owned task collection, mutated only through named operations.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::error::BookError;
use crate::occurrences::{Upcoming, occurrences_on, upcoming};
use crate::task::{Task, TaskDraft};
use crate::time::AsDayKey;

#[derive(Debug, Clone, Default)]
pub struct TaskBook {
    tasks: Vec<Task>,
    next_seq: u64,
}

impl TaskBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt already-validated tasks. Ids must be unique.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Result<Self, BookError> {
        let mut book = Self::new();
        let mut seen = HashSet::new();
        for t in tasks {
            if !seen.insert(t.id.clone()) {
                return Err(BookError::DuplicateId(t.id));
            }
            book.tasks.push(t);
        }
        Ok(book)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Validate a draft and append it under a fresh id.
    pub fn add(&mut self, draft: TaskDraft) -> Result<&Task, BookError> {
        let id = self.fresh_id();
        let task = draft.build(id)?;
        let slot = self.tasks.len();
        self.tasks.push(task);
        Ok(&self.tasks[slot])
    }

    /// Flip completion for the task, and with it every occurrence of its series.
    /// Returns the new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool, BookError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| BookError::UnknownTask(id.to_string()))?;
        task.completed = !task.completed;
        tracing::debug!(id, completed = task.completed, recurrence = %task.recurrence, "toggled task");
        Ok(task.completed)
    }

    pub fn on<D: AsDayKey + ?Sized>(&self, day: &D) -> Vec<&Task> {
        occurrences_on(&self.tasks, day)
    }

    pub fn upcoming(&self, now: NaiveDateTime, limit: usize) -> Vec<Upcoming<'_>> {
        upcoming(&self.tasks, now, limit)
    }

    fn fresh_id(&mut self) -> String {
        loop {
            self.next_seq += 1;
            let id = format!("task-{}", self.next_seq);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
