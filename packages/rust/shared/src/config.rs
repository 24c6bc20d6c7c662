//! Book configuration for yearbook.
//!
//! The config lives at `<base>/yearbook.toml` unless a path is given
//! explicitly. CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, YearbookError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "yearbook.toml";

// ---------------------------------------------------------------------------
// Config structs (matching yearbook.toml schema)
// ---------------------------------------------------------------------------

/// Top-level book config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookConfig {
    /// Merge settings.
    #[serde(default)]
    pub merge: MergeSection,

    /// Converter settings.
    #[serde(default)]
    pub convert: ConvertSection,
}

/// `[merge]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSection {
    /// Directory (relative to the base) that receives the merged document.
    #[serde(default = "default_merge_output_dir")]
    pub output_dir: String,

    /// File name of the merged document.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Book title. When set, `merge` produces the titled book layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Insert page breaks before level 2-4 headings (book layout only).
    #[serde(default = "default_true")]
    pub page_breaks: bool,
}

impl Default for MergeSection {
    fn default() -> Self {
        Self {
            output_dir: default_merge_output_dir(),
            output_file: default_output_file(),
            title: None,
            page_breaks: true,
        }
    }
}

fn default_merge_output_dir() -> String {
    "merged".into()
}
fn default_output_file() -> String {
    "merged.md".into()
}
fn default_true() -> bool {
    true
}

/// `[convert]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertSection {
    /// Converter executable, looked up on `PATH`.
    #[serde(default = "default_program")]
    pub program: String,

    /// Metadata file handed to the converter.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Stylesheet handed to the converter.
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,

    /// Table of contents depth.
    #[serde(default = "default_level")]
    pub toc_depth: u8,

    /// Heading level at which the output is split into files.
    #[serde(default = "default_level")]
    pub split_level: u8,

    /// Directory (relative to the base) that receives the artifact.
    #[serde(default = "default_convert_output_dir")]
    pub output_dir: String,

    /// Artifact extension; also selects the converter's output format.
    #[serde(default = "default_format")]
    pub format: String,

    /// Book title, used in the artifact name and as the merged document title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Version string, used in the artifact name.
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ConvertSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            metadata_file: default_metadata_file(),
            stylesheet: default_stylesheet(),
            toc_depth: default_level(),
            split_level: default_level(),
            output_dir: default_convert_output_dir(),
            format: default_format(),
            title: default_title(),
            version: default_version(),
        }
    }
}

fn default_program() -> String {
    "pandoc".into()
}
fn default_metadata_file() -> String {
    "metadata.yaml".into()
}
fn default_stylesheet() -> String {
    "epub.css".into()
}
fn default_level() -> u8 {
    2
}
fn default_convert_output_dir() -> String {
    "epub".into()
}
fn default_format() -> String {
    "epub".into()
}
fn default_title() -> String {
    "Yearbook".into()
}
fn default_version() -> String {
    "v1".into()
}

// ---------------------------------------------------------------------------
// Runtime configs (resolved against a base directory)
// ---------------------------------------------------------------------------

/// Layout of the merged document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStyle {
    /// `# YYYY` per year, no title.
    Flat,
    /// `# Title` first, then `## YYYY` per year.
    Book {
        title: String,
        /// Run the page-break pass over the merged text.
        page_breaks: bool,
    },
}

/// Runtime merge configuration.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Directory holding the `YYYY/` groups.
    pub base_dir: PathBuf,
    /// Destination of the merged document.
    pub output_path: PathBuf,
    /// Output layout.
    pub style: MergeStyle,
}

/// Runtime converter configuration.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub program: String,
    pub metadata_file: PathBuf,
    pub stylesheet: PathBuf,
    pub toc_depth: u8,
    pub split_level: u8,
    pub output_dir: PathBuf,
    pub format: String,
    pub title: String,
    pub version: String,
}

impl ConvertConfig {
    /// Path of the artifact the converter is asked to produce:
    /// `<output_dir>/<title>_<version>.<format>`.
    pub fn artifact_path(&self) -> PathBuf {
        let stem = format!("{}_{}", self.title, self.version).replace(['/', '\\'], "-");
        self.output_dir.join(format!("{stem}.{}", self.format))
    }
}

impl BookConfig {
    /// Merge configuration for `base`. Uses the book layout when a title is set.
    pub fn merge_config(&self, base: &Path) -> MergeConfig {
        let style = match &self.merge.title {
            Some(title) => MergeStyle::Book {
                title: title.clone(),
                page_breaks: self.merge.page_breaks,
            },
            None => MergeStyle::Flat,
        };
        MergeConfig {
            base_dir: base.to_path_buf(),
            output_path: base
                .join(&self.merge.output_dir)
                .join(&self.merge.output_file),
            style,
        }
    }

    /// Merge configuration for a full book build: always the book layout,
    /// titled from `[merge].title` or else `[convert].title`.
    pub fn book_merge_config(&self, base: &Path) -> MergeConfig {
        let title = self
            .merge
            .title
            .clone()
            .unwrap_or_else(|| self.convert.title.clone());
        MergeConfig {
            style: MergeStyle::Book {
                title,
                page_breaks: self.merge.page_breaks,
            },
            ..self.merge_config(base)
        }
    }

    /// Converter configuration with paths resolved against `base`.
    pub fn convert_config(&self, base: &Path) -> ConvertConfig {
        let c = &self.convert;
        ConvertConfig {
            program: c.program.clone(),
            metadata_file: base.join(&c.metadata_file),
            stylesheet: base.join(&c.stylesheet),
            toc_depth: c.toc_depth,
            split_level: c.split_level,
            output_dir: base.join(&c.output_dir),
            format: c.format.clone(),
            title: c.title.clone(),
            version: c.version.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Resolve the config for a base directory.
///
/// An explicit path must exist. Otherwise `<base>/yearbook.toml` is used when
/// present, and defaults when it is not.
pub fn load_config_for(base: &Path, explicit: Option<&Path>) -> Result<BookConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let path = base.join(CONFIG_FILE_NAME);
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(BookConfig::default());
    }

    load_config_from(&path)
}

/// Load the book config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<BookConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| YearbookError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| YearbookError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file to `path`, creating parent directories.
/// Returns the path written.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| YearbookError::filesystem(dir, e))?;
    }

    let content = toml::to_string_pretty(&BookConfig::default())
        .map_err(|e| YearbookError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| YearbookError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}
