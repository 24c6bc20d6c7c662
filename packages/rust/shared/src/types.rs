//! Core domain types: year groups and the source documents inside them.

use std::path::PathBuf;

use serde::Serialize;

/// File extension (without the dot) of source documents.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Returns true when `name` is exactly four ASCII decimal digits.
pub fn is_year_label(name: &str) -> bool {
    name.len() == 4 && name.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true when `name` ends with the markdown extension.
pub fn is_markdown_file(name: &str) -> bool {
    name.strip_suffix(MARKDOWN_EXTENSION)
        .is_some_and(|stem| stem.ends_with('.'))
}

// ---------------------------------------------------------------------------
// YearGroup
// ---------------------------------------------------------------------------

/// A `YYYY/` directory and the markdown files it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearGroup {
    /// Four-digit directory name.
    pub year: String,
    /// Path to the year directory.
    pub dir: PathBuf,
    /// Markdown files, sorted by file name.
    pub files: Vec<PathBuf>,
}

impl YearGroup {
    /// Number of markdown files in the group.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

// ---------------------------------------------------------------------------
// SourceDocument
// ---------------------------------------------------------------------------

/// One markdown file read from a year group.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Year label of the group the file belongs to.
    pub year: String,
    /// File name within the year directory.
    pub filename: String,
    /// Full text content.
    pub content: String,
}
