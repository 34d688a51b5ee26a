//! Shared test infrastructure for Satchel integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use satchel::{Assistant, TaskEntry, TASKS_FILE};
use std::fs;
use tempfile::TempDir;

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub assistant: Assistant,
}

impl TestEnv {
    /// Create a new test environment over bootstrapped records.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let assistant = Assistant::open(temp_dir.path()).expect("Failed to open assistant");
        assistant.bootstrap().expect("Failed to bootstrap records");
        Self {
            temp_dir,
            assistant,
        }
    }

    /// Add a pending task due today.
    pub fn add_task(&self, subject: &str, title: &str) {
        self.assistant
            .add_task(subject, title)
            .expect("Failed to add task");
    }

    /// Complete the task at a 1-based position, returning the reward.
    pub fn complete_task(&self, number: usize) -> u32 {
        self.assistant
            .complete_task(number)
            .expect("Failed to complete task")
            .coins_earned
    }

    /// Overwrite the stored task record with raw lines, as an earlier
    /// session (or a hand edit) could have left them.
    pub fn write_task_lines(&self, lines: &[&str]) {
        let mut contents = lines.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        fs::write(self.temp_dir.path().join(TASKS_FILE), contents)
            .expect("Failed to write task record");
    }

    /// The stored task record, raw.
    pub fn raw_task_record(&self) -> String {
        fs::read_to_string(self.temp_dir.path().join(TASKS_FILE))
            .expect("Failed to read task record")
    }

    /// Every stored entry.
    pub fn entries(&self) -> Vec<TaskEntry> {
        self.assistant.list_tasks().expect("Failed to list tasks")
    }

    /// Current coin balance.
    pub fn balance(&self) -> u32 {
        self.assistant.balance().expect("Failed to read balance")
    }

    /// Set the coin balance directly.
    pub fn set_balance(&self, coins: u32) {
        fs::write(self.temp_dir.path().join("Coins.txt"), coins.to_string())
            .expect("Failed to write coin record");
    }

    /// Titles of stored entries that parse as tasks, in order.
    pub fn titles(&self) -> Vec<String> {
        self.entries()
            .iter()
            .filter_map(|e| e.as_task().map(|t| t.title.clone()))
            .collect()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
