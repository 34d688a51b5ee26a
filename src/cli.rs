//! CLI argument parsing for Satchel.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "satchel",
    about = "Study task tracker with coin rewards and syllabus progress",
    version,
    after_help = "Logs are written to: ~/.local/share/satchel/logs/satchel.log"
)]
pub struct Cli {
    /// Path to the record directory (default: current directory)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// First-run signup: create the profile and subject records
    Init,

    /// Interactive menu session (the default)
    Menu,

    /// Prune stale completed tasks and show the balance
    Status,

    /// Add a pending task due today
    Add {
        /// Subject the task belongs to
        subject: String,

        /// Task title
        title: String,
    },

    /// List tasks in stored order
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a task done and earn a coin reward
    Done {
        /// Task number from `list` (1-based)
        number: usize,
    },

    /// Show how much of the task list is done
    Progress {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drop a task for 10 coins
    Skip {
        /// Task number from `list` (1-based)
        number: usize,
    },

    /// Track syllabus chapters per subject
    Syllabus {
        #[command(subcommand)]
        action: SyllabusAction,
    },
}

#[derive(Subcommand)]
pub enum SyllabusAction {
    /// Record a new subject
    Add {
        /// Subject name
        name: String,

        /// Total chapters in the subject
        chapters: u32,
    },

    /// Set how many chapters are covered
    Covered {
        /// Subject name
        name: String,

        /// Chapters covered so far
        chapters: u32,
    },

    /// Show every subject's completion percentage
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
