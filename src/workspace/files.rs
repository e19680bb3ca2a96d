//! Open editor files and the active-file pointer

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by file store commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileStoreError {
    #[error("File index {index} is out of range ({len} files open)")]
    OutOfRange { index: usize, len: usize },
    #[error("File {index} is no longer the active file (active is {active})")]
    NotActive { index: usize, active: usize },
    #[error("No active file")]
    NoActiveFile,
}

/// An in-memory editor buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Display name; duplicates are allowed
    pub name: String,
    /// Syntax highlighting tag (`typescript`, `python`, `javascript`, `java`)
    pub language: String,
    pub content: String,
}

impl FileRecord {
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            content: content.into(),
        }
    }
}

/// Ordered, grow-only set of files with exactly one active entry.
///
/// The store cannot be constructed empty, so `active < files.len()` holds
/// for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    files: Vec<FileRecord>,
    active: usize,
}

impl FileStore {
    /// Create a store holding a single file, which becomes active
    pub fn new(first: FileRecord) -> Self {
        Self {
            files: vec![first],
            active: 0,
        }
    }

    /// Append a file and make it active, returning its index
    pub fn create_file(&mut self, file: FileRecord) -> usize {
        self.files.push(file);
        self.active = self.files.len() - 1;
        self.active
    }

    /// Sidebar "new file" action: `untitled-<n>.js` with a stub comment
    pub fn create_untitled(&mut self) -> usize {
        let name = format!("untitled-{}.js", self.files.len() + 1);
        self.create_file(FileRecord::new(name, "javascript", "// New file\n"))
    }

    pub fn set_active(&mut self, index: usize) -> Result<(), FileStoreError> {
        if index >= self.files.len() {
            return Err(FileStoreError::OutOfRange {
                index,
                len: self.files.len(),
            });
        }
        self.active = index;
        Ok(())
    }

    /// Replace the content of the active file
    pub fn edit_active_content(&mut self, text: impl Into<String>) -> Result<(), FileStoreError> {
        let file = self
            .files
            .get_mut(self.active)
            .ok_or(FileStoreError::NoActiveFile)?;
        file.content = text.into();
        Ok(())
    }

    /// Fail unless `index` is the active file
    pub fn ensure_active(&self, index: usize) -> Result<(), FileStoreError> {
        if index != self.active {
            return Err(FileStoreError::NotActive {
                index,
                active: self.active,
            });
        }
        Ok(())
    }

    pub fn active(&self) -> &FileRecord {
        // Constructors guarantee at least one file and a valid pointer
        &self.files[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether `index` names an open file
    pub fn contains(&self, index: usize) -> bool {
        index < self.files.len()
    }
}
