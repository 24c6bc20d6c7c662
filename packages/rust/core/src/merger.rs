//! Merged document assembler.
//!
//! Walks the year groups under a base directory, shifts every source heading
//! one level deeper, and writes the concatenation to a single markdown file.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use yearbook_markdown::{adjust_headings, insert_page_breaks};
use yearbook_shared::{MergeConfig, MergeStyle, Result, SourceDocument, YearGroup, YearbookError};

use crate::pipeline::ProgressReporter;

/// Output from a successful merge.
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// Path of the merged document.
    pub output_path: PathBuf,
    /// Number of year groups merged.
    pub year_count: usize,
    /// Number of source files merged.
    pub file_count: usize,
    /// Size of the merged document in bytes.
    pub size_bytes: usize,
    /// Hex SHA-256 of the merged document.
    pub sha256: String,
}

/// Merge every year group under `config.base_dir` into `config.output_path`.
///
/// Produces the following layout (flat style):
/// ```text
/// # 2023
///
/// ## <first heading of 2023/a.md>
/// ...
///
/// # 2024
/// ...
/// ```
/// The book style prepends `# <title>` and uses `## <year>` instead.
///
/// The destination is overwritten unconditionally. Any unreadable source
/// aborts the whole merge.
#[instrument(skip_all, fields(
    base = %config.base_dir.display(),
    output = %config.output_path.display(),
))]
pub fn merge(config: &MergeConfig, progress: &dyn ProgressReporter) -> Result<MergeReport> {
    if let MergeStyle::Book { title, .. } = &config.style {
        if title.trim().is_empty() {
            return Err(YearbookError::validation("book title must not be empty"));
        }
        if title.contains(['\n', '\r']) {
            return Err(YearbookError::validation("book title must be a single line"));
        }
    }

    // A missing base must fail before the output directory is created under it.
    progress.phase("Discovering year groups");
    let groups = yearbook_discovery::discover(&config.base_dir)?;

    ensure_parent_dir(&config.output_path)?;

    info!(years = groups.len(), "merging year groups");
    progress.phase("Merging documents");

    let mut merged = String::new();
    if let MergeStyle::Book { title, .. } = &config.style {
        merged.push_str(&format!("# {title}\n\n"));
    }

    let year_marker = match config.style {
        MergeStyle::Flat => "#",
        MergeStyle::Book { .. } => "##",
    };

    let mut file_count = 0;
    for group in &groups {
        merged.push_str(&format!("{year_marker} {}\n\n", group.year));

        for path in &group.files {
            let doc = read_source(group, path)?;
            debug!(year = %doc.year, file = %doc.filename, bytes = doc.content.len(), "merging file");
            merged.push_str(&adjust_headings(&doc.content));
            merged.push('\n');
            file_count += 1;
        }

        progress.year_merged(&group.year, group.files.len());
    }

    if let MergeStyle::Book {
        page_breaks: true, ..
    } = config.style
    {
        merged = insert_page_breaks(&merged);
    }

    write_output(&config.output_path, &merged)?;

    info!(
        years = groups.len(),
        files = file_count,
        bytes = merged.len(),
        "merge complete"
    );

    Ok(MergeReport {
        output_path: config.output_path.clone(),
        year_count: groups.len(),
        file_count,
        size_bytes: merged.len(),
        sha256: sha256_hex(merged.as_bytes()),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|e| YearbookError::filesystem(dir, e))
        }
        _ => Ok(()),
    }
}

/// Read one source file in full. Invalid UTF-8 surfaces as an `Io` error.
fn read_source(group: &YearGroup, path: &Path) -> Result<SourceDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| YearbookError::io(path, e))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(SourceDocument {
        year: group.year.clone(),
        filename,
        content,
    })
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| YearbookError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| YearbookError::io(path, e))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
