//! Source discovery: finds `YYYY/` year groups under a base directory and
//! the markdown files inside each of them.
//!
//! Everything here is read-only and deterministic. Entries are sorted by
//! name, so repeated calls on an unchanged tree give the same result.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use yearbook_shared::{Result, YearGroup, YearbookError, is_markdown_file, is_year_label};

/// List the year labels under `base`, ascending.
///
/// Only directories named with exactly four decimal digits count; plain
/// files and any other directory names are ignored.
pub fn discover_years(base: &Path) -> Result<Vec<String>> {
    let mut years: Vec<String> = read_names(base)?
        .into_iter()
        .filter(|(name, path)| is_year_label(name) && path.is_dir())
        .map(|(name, _)| name)
        .collect();

    years.sort();
    Ok(years)
}

/// List the markdown files in a year directory, sorted by file name.
pub fn collect_markdown_files(year_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<(String, PathBuf)> = read_names(year_dir)?
        .into_iter()
        .filter(|(name, _)| is_markdown_file(name))
        .collect();

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries.into_iter().map(|(_, path)| path).collect())
}

/// Discover every year group under `base` together with its files.
#[instrument(skip_all, fields(base = %base.display()))]
pub fn discover(base: &Path) -> Result<Vec<YearGroup>> {
    let years = discover_years(base)?;
    debug!(count = years.len(), "found year groups");

    let mut groups = Vec::with_capacity(years.len());
    for year in years {
        let dir = base.join(&year);
        let files = collect_markdown_files(&dir)?;
        if files.is_empty() {
            warn!(%year, "year group has no markdown files");
        }
        groups.push(YearGroup { year, dir, files });
    }

    Ok(groups)
}

/// Read the entry names of a directory. Names that are not valid UTF-8 can
/// never match a year label or the markdown extension, so they are skipped.
fn read_names(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = std::fs::read_dir(dir).map_err(|e| YearbookError::filesystem(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| YearbookError::filesystem(dir, e))?;
        if let Ok(name) = entry.file_name().into_string() {
            names.push((name, entry.path()));
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        for year in ["2024", "2023", "20a1", "202", "20255", "misc"] {
            fs::create_dir(base.join(year)).unwrap();
        }
        // A file named like a year is not a year group.
        fs::write(base.join("2022"), "not a dir").unwrap();
        fs::write(base.join("2023/b.md"), "# B\n").unwrap();
        fs::write(base.join("2023/a.md"), "# A\n").unwrap();
        fs::write(base.join("2023/notes.txt"), "skip").unwrap();
        fs::write(base.join("2023/C.md"), "# C\n").unwrap();
        dir
    }

    #[test]
    fn discover_years_filters_and_sorts() {
        let dir = tree();
        let years = discover_years(dir.path()).unwrap();
        assert_eq!(years, vec!["2023", "2024"]);
    }

    #[test]
    fn discover_years_is_idempotent() {
        let dir = tree();
        let first = discover_years(dir.path()).unwrap();
        let second = discover_years(dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn discover_years_missing_base_is_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_years(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, YearbookError::Filesystem { .. }));
    }

    #[test]
    fn collect_markdown_files_sorted_lexicographically() {
        let dir = tree();
        let files = collect_markdown_files(&dir.path().join("2023")).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        // Byte order: uppercase sorts before lowercase.
        assert_eq!(names, vec!["C.md", "a.md", "b.md"]);
    }

    #[test]
    fn discover_groups_includes_empty_years() {
        let dir = tree();
        let groups = discover(dir.path()).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].year, "2023");
        assert_eq!(groups[0].file_count(), 3);
        assert_eq!(groups[1].year, "2024");
        assert!(groups[1].files.is_empty());
    }
}
