//! External document converter.
//!
//! The merged markdown is handed to an external tool (pandoc by default)
//! that produces the e-book. Only the tool's exit status is inspected.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, instrument};

use yearbook_shared::ConvertConfig;

/// Failure modes of a converter run.
#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    /// The executable is not on `PATH`.
    #[error("converter not found: '{program}' is not on PATH")]
    NotFound { program: String },

    /// The converter ran and exited unsuccessfully.
    #[error("converter '{program}' failed ({}): {stderr}", describe_exit(.code))]
    Failed {
        program: String,
        /// Exit code, or `None` when the process was killed by a signal.
        code: Option<i32>,
        stderr: String,
    },

    /// Output directory creation or process spawn failed.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Turns a merged markdown file into a distributable artifact.
pub trait Converter {
    /// Convert `input` and return the path of the produced artifact.
    fn convert(&self, input: &Path, config: &ConvertConfig) -> Result<PathBuf, ConverterError>;
}

/// Runs a pandoc-compatible command line as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct PandocConverter;

impl PandocConverter {
    /// Arguments passed to the converter for `input`, in order.
    pub fn args(input: &Path, config: &ConvertConfig) -> Vec<OsString> {
        let mut metadata = OsString::from("--metadata-file=");
        metadata.push(&config.metadata_file);
        let mut css = OsString::from("--css=");
        css.push(&config.stylesheet);

        vec![
            metadata,
            "--toc".into(),
            format!("--toc-depth={}", config.toc_depth).into(),
            "--top-level-division=chapter".into(),
            css,
            format!("--split-level={}", config.split_level).into(),
            "-o".into(),
            config.artifact_path().into_os_string(),
            input.as_os_str().to_os_string(),
        ]
    }
}

impl Converter for PandocConverter {
    #[instrument(skip_all, fields(program = %config.program, input = %input.display()))]
    fn convert(&self, input: &Path, config: &ConvertConfig) -> Result<PathBuf, ConverterError> {
        std::fs::create_dir_all(&config.output_dir).map_err(|source| ConverterError::Io {
            path: config.output_dir.clone(),
            source,
        })?;

        let artifact = config.artifact_path();
        let args = Self::args(input, config);
        debug!(?args, "spawning converter");

        let output = Command::new(&config.program)
            .args(&args)
            .output()
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => ConverterError::NotFound {
                    program: config.program.clone(),
                },
                _ => ConverterError::Io {
                    path: PathBuf::from(&config.program),
                    source,
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConverterError::Failed {
                program: config.program.clone(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        info!(artifact = %artifact.display(), "conversion complete");
        Ok(artifact)
    }
}
