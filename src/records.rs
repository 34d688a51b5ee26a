//! Flat-file record storage for the study assistant.
//!
//! Every piece of persisted state is a named plain-text record under a
//! single root directory: either a scalar (one value) or an ordered list
//! of lines. Writes replace whole files; the only append path is
//! [`RecordStore::append_line`], which does not need prior content.

use eyre::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A record whose stored content does not parse as its expected shape.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRecord {
    pub record: String,
    pub detail: String,
}

impl std::fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed record {}: {}", self.record, self.detail)
    }
}

impl std::error::Error for MalformedRecord {}

/// Handle to the record directory.
///
/// Missing records surface as `None` from the read methods; callers decide
/// whether that means "initialize" or "error". Nothing here defaults
/// silently.
#[derive(Clone)]
pub struct RecordStore {
    root: PathBuf,
}

impl RecordStore {
    /// Open (creating if necessary) the record directory.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create record directory {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Root directory holding the records.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Whether a record exists at all.
    pub fn exists(&self, name: &str) -> bool {
        self.record_path(name).exists()
    }

    /// Read a single-value record. `None` if the record does not exist.
    pub fn read_scalar(&self, name: &str) -> Result<Option<String>> {
        let path = self.record_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", name))?;
        Ok(Some(raw.trim().to_string()))
    }

    /// Overwrite a single-value record.
    pub fn write_scalar(&self, name: &str, value: &str) -> Result<()> {
        let path = self.record_path(name);
        self.ensure_parent(&path)?;
        fs::write(&path, value).with_context(|| format!("Failed to write {}", name))
    }

    /// Read a line-list record. `None` if the record does not exist.
    pub fn read_lines(&self, name: &str) -> Result<Option<Vec<String>>> {
        let path = self.record_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", name))?;
        Ok(Some(raw.lines().map(String::from).collect()))
    }

    /// Replace the entire content of a line-list record.
    pub fn overwrite_lines(&self, name: &str, lines: &[String]) -> Result<()> {
        let path = self.record_path(name);
        self.ensure_parent(&path)?;
        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(&path, content).with_context(|| format!("Failed to rewrite {}", name))
    }

    /// Append one line to a line-list record, creating it if absent. A
    /// missing final newline on the existing content is restored first.
    pub fn append_line(&self, name: &str, line: &str) -> Result<()> {
        let path = self.record_path(name);
        self.ensure_parent(&path)?;
        // A hand-edited record may have lost its final newline; appending
        // straight after it would merge two entries into one line.
        let unterminated = fs::read(&path)
            .map(|bytes| !bytes.is_empty() && !bytes.ends_with(b"\n"))
            .unwrap_or(false);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {} for append", name))?;
        if unterminated {
            writeln!(file).with_context(|| format!("Failed to append to {}", name))?;
        }
        writeln!(file, "{}", line).with_context(|| format!("Failed to append to {}", name))?;
        file.sync_all()
            .with_context(|| format!("Failed to sync {}", name))?;
        Ok(())
    }

    /// Create a record with the given content only if it does not exist.
    /// Returns true when the record was created.
    pub fn create_if_missing(&self, name: &str, contents: &str) -> Result<bool> {
        let path = self.record_path(name);
        if path.exists() {
            return Ok(false);
        }
        self.ensure_parent(&path)?;
        fs::write(&path, contents).with_context(|| format!("Failed to create {}", name))?;
        Ok(true)
    }

    /// Record names (file stems, `.txt` stripped) under a sub-directory,
    /// sorted by name. Directory enumeration order is filesystem-defined,
    /// so callers never see it.
    pub fn list_records(&self, subdir: &str) -> Result<Vec<String>> {
        let dir = self.record_path(subdir);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in
            fs::read_dir(&dir).with_context(|| format!("Failed to list records in {}", subdir))?
        {
            let entry = entry.with_context(|| format!("Failed to read entry in {}", subdir))?;
            let path = entry.path();
            if path.is_file()
                && path.extension().is_some_and(|e| e == "txt")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Create a record sub-directory. Idempotent.
    pub fn create_dir(&self, subdir: &str) -> Result<()> {
        let dir = self.record_path(subdir);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", subdir))?;
        Ok(())
    }

    fn ensure_parent(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        Ok(())
    }
}
