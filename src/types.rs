//! Core data types for the study assistant.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Leading marker for a pending task line.
pub const PENDING_MARKER: &str = "[🕒]";

/// Leading marker for a completed task line.
pub const COMPLETED_MARKER: &str = "[✅]";

/// Date layout used everywhere a date is persisted.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DUE_SEPARATOR: &str = " - Due: ";

/// Task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    /// The marker token this status renders as.
    pub fn marker(&self) -> &'static str {
        match self {
            TaskStatus::Pending => PENDING_MARKER,
            TaskStatus::Completed => COMPLETED_MARKER,
        }
    }
}

/// One unit of study work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Current state
    pub status: TaskStatus,

    /// Short description of the work
    pub title: String,

    /// Subject the task belongs to (not checked against the syllabus)
    pub subject: String,

    /// Due date, fixed to the creation date
    pub due: NaiveDate,
}

/// Validation errors for tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyTitle,
    EmptySubject,
    ControlCharacters,
    SubjectParentheses,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "title cannot be empty"),
            ValidationError::EmptySubject => write!(f, "subject cannot be empty"),
            ValidationError::ControlCharacters => {
                write!(f, "title and subject cannot contain control characters")
            }
            ValidationError::SubjectParentheses => {
                write!(f, "subject cannot contain parentheses")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl Task {
    /// Create a pending task due on its creation date.
    pub fn new(subject: &str, title: &str, due: NaiveDate) -> Self {
        Self {
            status: TaskStatus::Pending,
            title: title.to_string(),
            subject: subject.to_string(),
            due,
        }
    }

    /// Validate the task's fields.
    ///
    /// Control characters would break the one-line encoding; parentheses in
    /// the subject would make it ambiguous to re-parse.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.subject.is_empty() {
            return Err(ValidationError::EmptySubject);
        }
        if self.title.chars().any(|c| c.is_control()) || self.subject.chars().any(|c| c.is_control())
        {
            return Err(ValidationError::ControlCharacters);
        }
        if self.subject.contains('(') || self.subject.contains(')') {
            return Err(ValidationError::SubjectParentheses);
        }
        Ok(())
    }

    /// Render the task as its stored line:
    /// `[<marker>] <title> (<subject>) - Due: <YYYY-MM-DD>`
    pub fn encode(&self) -> String {
        format!(
            "{} {} ({}){}{}",
            self.status.marker(),
            self.title,
            self.subject,
            DUE_SEPARATOR,
            self.due.format(DATE_FORMAT)
        )
    }

    /// Parse a stored line. The subject is the rightmost parenthesized
    /// group before the due suffix, so a title may itself contain
    /// parentheses. A line whose fields would not validate is rejected.
    fn parse(line: &str) -> Option<Task> {
        let (status, rest) = if let Some(rest) = line.strip_prefix(PENDING_MARKER) {
            (TaskStatus::Pending, rest.strip_prefix(' ')?)
        } else if let Some(rest) = line.strip_prefix(COMPLETED_MARKER) {
            (TaskStatus::Completed, rest.strip_prefix(' ')?)
        } else {
            return None;
        };

        let due_pos = rest.rfind(DUE_SEPARATOR)?;
        let due =
            NaiveDate::parse_from_str(&rest[due_pos + DUE_SEPARATOR.len()..], DATE_FORMAT).ok()?;

        let before = rest[..due_pos].strip_suffix(')')?;
        let open = before.rfind(" (")?;
        let task = Task {
            status,
            title: before[..open].to_string(),
            subject: before[open + 2..].to_string(),
            due,
        };
        task.validate().ok()?;
        Some(task)
    }
}

/// One line of the task record: a task when the line round-trips
/// losslessly, otherwise the raw content kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskEntry {
    Task(Task),
    Opaque(String),
}

impl TaskEntry {
    /// Parse a stored line. Never fails: a line that does not re-encode
    /// byte-identically is kept opaque rather than misread.
    pub fn parse(line: &str) -> TaskEntry {
        match Task::parse(line) {
            Some(task) if task.encode() == line => TaskEntry::Task(task),
            _ => TaskEntry::Opaque(line.to_string()),
        }
    }

    /// The stored line for this entry.
    pub fn encode(&self) -> String {
        match self {
            TaskEntry::Task(task) => task.encode(),
            TaskEntry::Opaque(line) => line.clone(),
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            TaskEntry::Task(task) => Some(task),
            TaskEntry::Opaque(_) => None,
        }
    }

    /// Exact-token status classification: the line's first space-separated
    /// token must equal a marker. An opaque line can still classify here
    /// while carrying no parseable task.
    pub fn status_token(&self) -> Option<TaskStatus> {
        let line = match self {
            TaskEntry::Task(task) => return Some(task.status),
            TaskEntry::Opaque(line) => line,
        };
        match line.split(' ').next() {
            Some(PENDING_MARKER) => Some(TaskStatus::Pending),
            Some(COMPLETED_MARKER) => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Write-once signup record: who is studying, and since when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub class_level: u32,
    pub signed_up: NaiveDate,
}

impl Profile {
    /// Parse the three stored lines: name, class, signup date.
    pub fn parse(lines: &[String]) -> Option<Profile> {
        if lines.len() != 3 {
            return None;
        }
        let class_level = lines[1].trim().parse().ok()?;
        let signed_up = NaiveDate::parse_from_str(lines[2].trim(), DATE_FORMAT).ok()?;
        Some(Profile {
            name: lines[0].clone(),
            class_level,
            signed_up,
        })
    }

    /// The three stored lines.
    pub fn encode(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.class_level.to_string(),
            self.signed_up.format(DATE_FORMAT).to_string(),
        ]
    }
}
