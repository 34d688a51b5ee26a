//! Satchel: a plain-text study assistant library.
//!
//! Satchel tracks study tasks, pays coin rewards for finishing them, and
//! records per-subject syllabus progress. Everything persists as small
//! text files in one directory, editable by hand between sessions.
//!
//! # Example
//!
//! ```no_run
//! use satchel::Assistant;
//! use std::path::Path;
//!
//! // Open a session over a record directory
//! let assistant = Assistant::open(Path::new("study")).unwrap();
//! assistant.bootstrap().unwrap();
//!
//! // Start-of-session housekeeping
//! let report = assistant.load().unwrap();
//! println!("{} coins", report.balance);
//!
//! // Add a task and complete it for a reward
//! assistant.add_task("Math", "Algebra homework").unwrap();
//! let done = assistant.complete_task(1).unwrap();
//! assert!(done.coins_earned % 5 == 0);
//!
//! // Track syllabus chapters
//! assistant.initialize_syllabus().unwrap();
//! assistant.add_subject("Math", 20).unwrap();
//! assistant.set_covered("Math", 5).unwrap();
//! ```

mod coins;
mod engine;
mod records;
mod reward;
mod session;
mod syllabus;
mod tasks;
mod types;

// Re-export public API
pub use coins::{CoinError, CoinLedger, COINS_FILE};
pub use engine::{Assistant, Completion, LoadReport, PROFILE_FILE, SKIP_COST};
pub use records::{MalformedRecord, RecordStore};
pub use reward::{draw_reward, MAX_REWARD, MIN_REWARD};
pub use session::SessionLock;
pub use syllabus::{SubjectProgress, Syllabus, SyllabusError, SUBJECTS_DIR};
pub use tasks::{TaskError, TaskProgress, TaskStore, STALE_AFTER_DAYS, TASKS_FILE};
pub use types::{
    Profile, Task, TaskEntry, TaskStatus, ValidationError, COMPLETED_MARKER, DATE_FORMAT,
    PENDING_MARKER,
};
