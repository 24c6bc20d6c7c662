//! Shared types, error model, and configuration for yearbook.
//!
//! This crate is the foundation depended on by all other yearbook crates.
//! It provides:
//! - [`YearbookError`] — the unified error type
//! - Domain types ([`YearGroup`], [`SourceDocument`])
//! - Configuration ([`BookConfig`], [`MergeConfig`], [`ConvertConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    BookConfig, CONFIG_FILE_NAME, ConvertConfig, ConvertSection, MergeConfig, MergeSection,
    MergeStyle, init_config, load_config_for, load_config_from,
};
pub use error::{Result, YearbookError};
pub use types::{MARKDOWN_EXTENSION, SourceDocument, YearGroup, is_markdown_file, is_year_label};
