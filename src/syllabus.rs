//! Per-subject syllabus progress records.
//!
//! Each subject lives in its own two-line record under `Subjects/`:
//! total chapters on the first line, chapters covered on the second.

use crate::records::{MalformedRecord, RecordStore};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// Sub-directory holding one record per subject.
pub const SUBJECTS_DIR: &str = "Subjects";

/// Errors for syllabus operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyllabusError {
    /// No record for the named subject.
    SubjectNotFound(String),
    /// A record for the named subject already exists.
    DuplicateSubject(String),
    /// A subject needs at least one chapter.
    NoChapters,
    /// Covered count past the recorded total.
    CoveredExceedsTotal { covered: u32, total: u32 },
    /// Name that cannot become a record file name.
    InvalidName(String),
}

impl std::fmt::Display for SyllabusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyllabusError::SubjectNotFound(name) => write!(f, "subject not found: {}", name),
            SyllabusError::DuplicateSubject(name) => {
                write!(f, "subject already recorded: {}", name)
            }
            SyllabusError::NoChapters => write!(f, "a subject needs at least one chapter"),
            SyllabusError::CoveredExceedsTotal { covered, total } => {
                write!(f, "covered {} chapters but the subject has {}", covered, total)
            }
            SyllabusError::InvalidName(name) => write!(f, "invalid subject name: {:?}", name),
        }
    }
}

impl std::error::Error for SyllabusError {}

/// One subject's chapter progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProgress {
    pub subject: String,
    pub total_chapters: u32,
    pub covered_chapters: u32,
}

impl SubjectProgress {
    /// Covered share in percent. Totals are validated positive on write.
    pub fn percentage(&self) -> f64 {
        f64::from(self.covered_chapters) / f64::from(self.total_chapters) * 100.0
    }
}

/// Syllabus records over a record store.
pub struct Syllabus {
    records: RecordStore,
}

impl Syllabus {
    pub fn new(records: RecordStore) -> Self {
        Syllabus { records }
    }

    /// Whether the subjects directory exists yet. Signup uses this to run
    /// its one-time subject setup.
    pub fn is_initialized(&self) -> bool {
        self.records.exists(SUBJECTS_DIR)
    }

    /// Create the subjects directory.
    pub fn initialize(&self) -> Result<()> {
        self.records.create_dir(SUBJECTS_DIR)
    }

    /// Record a new subject with nothing covered yet.
    pub fn add_subject(&self, name: &str, total_chapters: u32) -> Result<SubjectProgress> {
        Self::validate_name(name)?;
        if total_chapters == 0 {
            return Err(eyre::eyre!(SyllabusError::NoChapters));
        }
        let record = Self::record_name(name);
        if self.records.exists(&record) {
            return Err(eyre::eyre!(SyllabusError::DuplicateSubject(name.to_string())));
        }
        self.records
            .write_scalar(&record, &format!("{}\n0", total_chapters))
            .with_context(|| format!("Failed to create subject {}", name))?;
        Ok(SubjectProgress {
            subject: name.to_string(),
            total_chapters,
            covered_chapters: 0,
        })
    }

    /// Set how many chapters are covered. The stored total is the ceiling;
    /// the total line is preserved as read.
    pub fn set_covered(&self, name: &str, covered: u32) -> Result<SubjectProgress> {
        Self::validate_name(name)?;
        let record = Self::record_name(name);
        let Some(lines) = self.records.read_lines(&record)? else {
            return Err(eyre::eyre!(SyllabusError::SubjectNotFound(name.to_string())));
        };
        let total = Self::parse_total(&lines).ok_or_else(|| {
            eyre::eyre!(MalformedRecord {
                record: record.clone(),
                detail: "expected a positive chapter total on the first line".to_string(),
            })
        })?;
        if covered > total {
            return Err(eyre::eyre!(SyllabusError::CoveredExceedsTotal { covered, total }));
        }
        self.records
            .write_scalar(&record, &format!("{}\n{}", total, covered))
            .with_context(|| format!("Failed to update subject {}", name))?;
        Ok(SubjectProgress {
            subject: name.to_string(),
            total_chapters: total,
            covered_chapters: covered,
        })
    }

    /// One subject's progress, or None if it has no record.
    pub fn get(&self, name: &str) -> Result<Option<SubjectProgress>> {
        Self::validate_name(name)?;
        let record = Self::record_name(name);
        let Some(lines) = self.records.read_lines(&record)? else {
            return Ok(None);
        };
        let (total, covered) = Self::parse_counts(&lines).ok_or_else(|| {
            eyre::eyre!(MalformedRecord {
                record,
                detail: "expected two lines: chapter total, chapters covered".to_string(),
            })
        })?;
        Ok(Some(SubjectProgress {
            subject: name.to_string(),
            total_chapters: total,
            covered_chapters: covered,
        }))
    }

    /// Every subject's progress, sorted by name. Records that do not parse
    /// are skipped with a warning rather than failing the listing.
    pub fn list(&self) -> Result<Vec<SubjectProgress>> {
        let mut subjects = Vec::new();
        for name in self.records.list_records(SUBJECTS_DIR)? {
            let record = Self::record_name(&name);
            let Some(lines) = self.records.read_lines(&record)? else {
                continue;
            };
            match Self::parse_counts(&lines) {
                Some((total, covered)) => subjects.push(SubjectProgress {
                    subject: name,
                    total_chapters: total,
                    covered_chapters: covered,
                }),
                None => log::warn!("Skipping malformed subject record: {}", record),
            }
        }
        Ok(subjects)
    }

    fn record_name(subject: &str) -> String {
        format!("{}/{}.txt", SUBJECTS_DIR, subject)
    }

    /// Subject names become file names, so anything a path would interpret
    /// is rejected up front.
    fn validate_name(name: &str) -> Result<()> {
        let bad = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
            || name.chars().any(|c| c.is_control());
        if bad {
            return Err(eyre::eyre!(SyllabusError::InvalidName(name.to_string())));
        }
        Ok(())
    }

    fn parse_total(lines: &[String]) -> Option<u32> {
        let total: u32 = lines.first()?.trim().parse().ok()?;
        if total == 0 {
            return None;
        }
        Some(total)
    }

    fn parse_counts(lines: &[String]) -> Option<(u32, u32)> {
        let total = Self::parse_total(lines)?;
        let covered = lines.get(1)?.trim().parse().ok()?;
        Some((total, covered))
    }
}
