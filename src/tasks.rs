//! Task list operations over the stored task record.
//!
//! The record is rewritten wholesale on every mutation except `add`, which
//! appends. Lines that do not parse as tasks ride along untouched.

use crate::records::RecordStore;
use crate::types::{Task, TaskEntry, TaskStatus, ValidationError};
use chrono::NaiveDate;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// Record holding the task list, one entry per line.
pub const TASKS_FILE: &str = "Tasks.txt";

/// Days a completed task lingers before prune removes it.
pub const STALE_AFTER_DAYS: i64 = 3;

/// Errors for task list operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskError {
    /// Position outside the current list.
    IndexOutOfRange { index: usize, len: usize },
    /// Completion asked of an entry that is not a pending task.
    NotPending { index: usize },
    /// Validation error.
    Validation(ValidationError),
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskError::IndexOutOfRange { index, len } => {
                write!(f, "no task at position {} (list has {})", index, len)
            }
            TaskError::NotPending { index } => {
                write!(f, "task {} is not a pending task", index)
            }
            TaskError::Validation(e) => write!(f, "validation error: {}", e),
        }
    }
}

impl std::error::Error for TaskError {}

/// Completion summary for the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub done: usize,
    pub pending: usize,
    pub total: usize,
    pub percent: f64,
}

/// Task list over a record store. Positions in the public API are 1-based,
/// matching what a listing shows.
pub struct TaskStore {
    records: RecordStore,
}

impl TaskStore {
    pub fn new(records: RecordStore) -> Self {
        TaskStore { records }
    }

    /// Create an empty task record if absent. Returns true when a fresh
    /// record was written.
    pub fn initialize(&self) -> Result<bool> {
        self.records.create_if_missing(TASKS_FILE, "")
    }

    /// Every stored entry, in file order.
    pub fn list(&self) -> Result<Vec<TaskEntry>> {
        let lines = self.records.read_lines(TASKS_FILE)?.unwrap_or_default();
        Ok(lines.iter().map(|line| TaskEntry::parse(line)).collect())
    }

    /// Append a new pending task. Validation happens before anything is
    /// written; the append never touches existing lines.
    pub fn add(&self, subject: &str, title: &str, due: NaiveDate) -> Result<Task> {
        let task = Task::new(subject, title, due);

        // Validate before persisting
        task.validate()
            .map_err(|e| eyre::eyre!(TaskError::Validation(e)))?;

        self.records
            .append_line(TASKS_FILE, &task.encode())
            .context("Failed to persist task")?;
        Ok(task)
    }

    /// Mark the pending task at a 1-based position completed and move it to
    /// the end of the list.
    pub fn complete(&self, index: usize) -> Result<Task> {
        let mut entries = self.list()?;
        let slot = Self::slot(index, entries.len())?;
        // Error paths below return before persist, so the record stays as it was.
        let TaskEntry::Task(mut task) = entries.remove(slot) else {
            return Err(eyre::eyre!(TaskError::NotPending { index }));
        };
        if task.status != TaskStatus::Pending {
            return Err(eyre::eyre!(TaskError::NotPending { index }));
        }
        task.status = TaskStatus::Completed;
        entries.push(TaskEntry::Task(task.clone()));
        self.persist(&entries)?;
        Ok(task)
    }

    /// Remove the entry at a 1-based position outright. Works on any entry,
    /// parseable or not.
    pub fn remove(&self, index: usize) -> Result<TaskEntry> {
        let mut entries = self.list()?;
        let slot = Self::slot(index, entries.len())?;
        let removed = entries.remove(slot);
        self.persist(&entries)?;
        Ok(removed)
    }

    /// Drop completed tasks due `STALE_AFTER_DAYS` or more days before
    /// `today`. Pending tasks and unparseable lines always survive. Returns
    /// how many entries were removed.
    pub fn prune_stale(&self, today: NaiveDate) -> Result<usize> {
        let entries = self.list()?;
        let before = entries.len();
        let kept: Vec<TaskEntry> = entries
            .into_iter()
            .filter(|entry| Self::keep(entry, today))
            .collect();
        let pruned = before - kept.len();
        if pruned > 0 {
            self.persist(&kept)?;
        }
        Ok(pruned)
    }

    /// Completion summary. Done and pending count exact marker tokens;
    /// anything else counts only in the total. An empty list reports 0%.
    pub fn progress(&self) -> Result<TaskProgress> {
        let entries = self.list()?;
        let done = entries
            .iter()
            .filter(|e| e.status_token() == Some(TaskStatus::Completed))
            .count();
        let pending = entries
            .iter()
            .filter(|e| e.status_token() == Some(TaskStatus::Pending))
            .count();
        let total = entries.len();
        let percent = if total == 0 {
            0.0
        } else {
            done as f64 / total as f64 * 100.0
        };
        Ok(TaskProgress {
            done,
            pending,
            total,
            percent,
        })
    }

    fn keep(entry: &TaskEntry, today: NaiveDate) -> bool {
        match entry.as_task() {
            Some(task) if task.status == TaskStatus::Completed => {
                (today - task.due).num_days() < STALE_AFTER_DAYS
            }
            Some(_) => true,
            None => {
                log::warn!("Keeping unparseable task line: {}", entry.encode());
                true
            }
        }
    }

    fn slot(index: usize, len: usize) -> Result<usize> {
        if index == 0 || index > len {
            return Err(eyre::eyre!(TaskError::IndexOutOfRange { index, len }));
        }
        Ok(index - 1)
    }

    fn persist(&self, entries: &[TaskEntry]) -> Result<()> {
        let lines: Vec<String> = entries.iter().map(TaskEntry::encode).collect();
        self.records
            .overwrite_lines(TASKS_FILE, &lines)
            .context("Failed to rewrite task list")
    }
}
