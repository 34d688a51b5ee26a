//! The study assistant engine.
//!
//! Owns the record store and wires the task list, coin ledger, and syllabus
//! together. Cross-record rules live here: completion pays a reward,
//! skipping costs coins, and a session starts by pruning stale tasks.

use crate::coins::CoinLedger;
use crate::records::{MalformedRecord, RecordStore};
use crate::reward;
use crate::session::SessionLock;
use crate::syllabus::{SubjectProgress, Syllabus};
use crate::tasks::{TaskError, TaskProgress, TaskStore};
use crate::types::{Profile, Task, TaskEntry};
use chrono::{Local, NaiveDate};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Record holding the signup profile.
pub const PROFILE_FILE: &str = "User Info.txt";

/// Flat coin cost of skipping a task.
pub const SKIP_COST: u32 = 10;

/// What a session learns on load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub pruned: usize,
    pub balance: u32,
}

/// Outcome of completing a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub task: Task,
    pub coins_earned: u32,
    pub balance: u32,
}

/// A live session over one record directory. Holds the session lock for
/// its lifetime.
pub struct Assistant {
    records: RecordStore,
    tasks: TaskStore,
    coins: CoinLedger,
    syllabus: Syllabus,
    _lock: SessionLock,
}

impl Assistant {
    /// Open a session over a record directory, creating it if needed and
    /// taking the session lock.
    pub fn open(root: &Path) -> Result<Assistant> {
        let records = RecordStore::open(root)?;
        let lock = SessionLock::acquire(records.root())?;
        Ok(Assistant {
            tasks: TaskStore::new(records.clone()),
            coins: CoinLedger::new(records.clone()),
            syllabus: Syllabus::new(records.clone()),
            records,
            _lock: lock,
        })
    }

    /// Ensure the always-present records exist: a zero coin balance and an
    /// empty task list. The profile and subjects are created by signup.
    pub fn bootstrap(&self) -> Result<()> {
        if self.coins.initialize()? {
            log::info!("Created coin record");
        }
        if self.tasks.initialize()? {
            log::info!("Created task record");
        }
        Ok(())
    }

    /// Start-of-session housekeeping: prune stale completed tasks, then
    /// report the resulting state.
    pub fn load(&self) -> Result<LoadReport> {
        let pruned = self.tasks.prune_stale(today())?;
        if pruned > 0 {
            log::info!("Pruned {} stale completed task(s)", pruned);
        }
        let balance = self.coins.balance()?;
        Ok(LoadReport { pruned, balance })
    }

    /// The signup profile, or None before signup.
    pub fn profile(&self) -> Result<Option<Profile>> {
        let Some(lines) = self.records.read_lines(PROFILE_FILE)? else {
            return Ok(None);
        };
        let profile = Profile::parse(&lines).ok_or_else(|| {
            eyre::eyre!(MalformedRecord {
                record: PROFILE_FILE.to_string(),
                detail: "expected three lines: name, class, signup date".to_string(),
            })
        })?;
        Ok(Some(profile))
    }

    /// Write the signup record. Signup happens once; a second call errors.
    pub fn create_profile(&self, name: &str, class_level: u32) -> Result<Profile> {
        if self.records.exists(PROFILE_FILE) {
            eyre::bail!("a profile already exists");
        }
        let profile = Profile {
            name: name.to_string(),
            class_level,
            signed_up: today(),
        };
        self.records
            .overwrite_lines(PROFILE_FILE, &profile.encode())
            .context("Failed to write profile")?;
        log::info!("Created profile for {}", profile.name);
        Ok(profile)
    }

    /// Add a pending task due today.
    pub fn add_task(&self, subject: &str, title: &str) -> Result<Task> {
        self.tasks.add(subject, title, today())
    }

    pub fn list_tasks(&self) -> Result<Vec<TaskEntry>> {
        self.tasks.list()
    }

    /// Complete the task at a 1-based position. The task moves to the end
    /// of the list, then a reward lands on the balance.
    pub fn complete_task(&self, index: usize) -> Result<Completion> {
        let task = self.tasks.complete(index)?;
        let coins_earned = reward::draw_reward(&mut rand::rng());
        let balance = self.coins.credit(coins_earned)?;
        log::info!("Completed task {:?}, earned {} coins", task.title, coins_earned);
        Ok(Completion {
            task,
            coins_earned,
            balance,
        })
    }

    pub fn progress(&self) -> Result<TaskProgress> {
        self.tasks.progress()
    }

    /// Drop the entry at a 1-based position for a flat fee. The position is
    /// checked before the debit, so a bad one never costs anything, and an
    /// uncovered fee leaves the list untouched. Returns the new balance.
    pub fn skip_task(&self, index: usize) -> Result<u32> {
        let len = self.tasks.list()?.len();
        if index == 0 || index > len {
            return Err(eyre::eyre!(TaskError::IndexOutOfRange { index, len }));
        }
        let balance = self.coins.debit(SKIP_COST)?;
        let removed = self.tasks.remove(index)?;
        log::info!("Skipped entry {:?} for {} coins", removed.encode(), SKIP_COST);
        Ok(balance)
    }

    pub fn balance(&self) -> Result<u32> {
        self.coins.balance()
    }

    pub fn syllabus_initialized(&self) -> bool {
        self.syllabus.is_initialized()
    }

    pub fn initialize_syllabus(&self) -> Result<()> {
        self.syllabus.initialize()
    }

    pub fn add_subject(&self, name: &str, total_chapters: u32) -> Result<SubjectProgress> {
        self.syllabus.add_subject(name, total_chapters)
    }

    /// Set how many chapters of a subject are covered.
    pub fn set_covered(&self, name: &str, covered: u32) -> Result<SubjectProgress> {
        self.syllabus.set_covered(name, covered)
    }

    pub fn subject(&self, name: &str) -> Result<Option<SubjectProgress>> {
        self.syllabus.get(name)
    }

    /// Every subject's progress, sorted by name.
    pub fn subjects(&self) -> Result<Vec<SubjectProgress>> {
        self.syllabus.list()
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
