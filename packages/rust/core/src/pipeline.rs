//! End-to-end `build` pipeline: year groups → merged markdown → e-book.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use yearbook_shared::{ConvertConfig, MergeConfig, Result};

use crate::converter::{Converter, ConverterError};
use crate::merger::{self, MergeReport};

/// Configuration for the `build` pipeline.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// How to merge the sources.
    pub merge: MergeConfig,
    /// How to convert the merged document.
    pub convert: ConvertConfig,
}

/// Outcome of the conversion step. Converter problems end up here instead of
/// failing the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionStatus {
    /// The converter exited successfully.
    Succeeded { artifact: PathBuf },
    /// The converter executable is not on `PATH`.
    ConverterNotFound { program: String },
    /// The converter ran but failed, or could not be started.
    ConverterFailed { message: String },
}

impl ConversionStatus {
    /// True when the converter produced its artifact.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

impl From<std::result::Result<PathBuf, ConverterError>> for ConversionStatus {
    fn from(result: std::result::Result<PathBuf, ConverterError>) -> Self {
        match result {
            Ok(artifact) => Self::Succeeded { artifact },
            Err(ConverterError::NotFound { program }) => Self::ConverterNotFound { program },
            Err(e) => Self::ConverterFailed {
                message: e.to_string(),
            },
        }
    }
}

/// Result of the `build` pipeline.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Merge step output.
    pub merge: MergeReport,
    /// Conversion step outcome.
    pub conversion: ConversionStatus,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after all files of a year group are merged.
    fn year_merged(&self, year: &str, files: usize);
    /// Called when the pipeline completes, successfully or not.
    fn done(&self);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn year_merged(&self, _year: &str, _files: usize) {}
    fn done(&self) {}
}

/// Run the full `build` pipeline.
///
/// 1. Merge the year groups (errors here are fatal)
/// 2. Convert the merged document (errors become a [`ConversionStatus`])
#[instrument(skip_all, fields(
    base = %config.merge.base_dir.display(),
    program = %config.convert.program,
))]
pub fn build(
    config: &BuildConfig,
    converter: &dyn Converter,
    progress: &dyn ProgressReporter,
) -> Result<BuildReport> {
    let start = Instant::now();

    let merge_report = match merger::merge(&config.merge, progress) {
        Ok(report) => report,
        Err(e) => {
            progress.done();
            return Err(e);
        }
    };

    progress.phase("Converting merged document");
    let conversion = ConversionStatus::from(
        converter.convert(&merge_report.output_path, &config.convert),
    );

    match &conversion {
        ConversionStatus::Succeeded { artifact } => {
            info!(artifact = %artifact.display(), "build complete");
        }
        ConversionStatus::ConverterNotFound { program } => {
            warn!(%program, "converter not found");
        }
        ConversionStatus::ConverterFailed { message } => {
            warn!(%message, "converter failed");
        }
    }

    progress.done();

    Ok(BuildReport {
        merge: merge_report,
        conversion,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    use yearbook_shared::{BookConfig, MergeStyle};

    use super::*;

    /// Records its input and "produces" the artifact by copying the input.
    #[derive(Default)]
    struct CopyConverter {
        seen: Mutex<Vec<PathBuf>>,
    }

    impl Converter for CopyConverter {
        fn convert(
            &self,
            input: &Path,
            config: &ConvertConfig,
        ) -> std::result::Result<PathBuf, ConverterError> {
            self.seen.lock().unwrap().push(input.to_path_buf());
            let artifact = config.artifact_path();
            fs::create_dir_all(&config.output_dir).unwrap();
            fs::copy(input, &artifact).unwrap();
            Ok(artifact)
        }
    }

    struct MissingConverter;

    impl Converter for MissingConverter {
        fn convert(
            &self,
            _input: &Path,
            config: &ConvertConfig,
        ) -> std::result::Result<PathBuf, ConverterError> {
            Err(ConverterError::NotFound {
                program: config.program.clone(),
            })
        }
    }

    struct FailingConverter;

    impl Converter for FailingConverter {
        fn convert(
            &self,
            _input: &Path,
            config: &ConvertConfig,
        ) -> std::result::Result<PathBuf, ConverterError> {
            Err(ConverterError::Failed {
                program: config.program.clone(),
                code: Some(64),
                stderr: "unknown option".into(),
            })
        }
    }

    fn book(base: &Path) -> BuildConfig {
        let config = BookConfig::default();
        BuildConfig {
            merge: config.book_merge_config(base),
            convert: config.convert_config(base),
        }
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("2023")).unwrap();
        fs::write(dir.path().join("2023/a.md"), "# Intro\ntext\n").unwrap();
        dir
    }

    #[test]
    fn build_converts_merged_document() {
        let dir = tree();
        let config = book(dir.path());
        let converter = CopyConverter::default();

        let report = build(&config, &converter, &SilentProgress).unwrap();

        assert!(matches!(config.merge.style, MergeStyle::Book { .. }));
        assert_eq!(*converter.seen.lock().unwrap(), vec![report.merge.output_path.clone()]);
        let artifact = dir.path().join("epub/Yearbook_v1.epub");
        assert_eq!(
            report.conversion,
            ConversionStatus::Succeeded {
                artifact: artifact.clone()
            }
        );
        let content = fs::read_to_string(artifact).unwrap();
        assert!(content.starts_with("# Yearbook\n\n"));
    }

    #[test]
    fn missing_converter_is_a_status_not_an_error() {
        let dir = tree();
        let report = build(&book(dir.path()), &MissingConverter, &SilentProgress).unwrap();

        assert_eq!(
            report.conversion,
            ConversionStatus::ConverterNotFound {
                program: "pandoc".into()
            }
        );
        assert!(!report.conversion.is_success());
        // The merged document is still written.
        assert!(report.merge.output_path.exists());
    }

    #[test]
    fn failing_converter_is_a_status_not_an_error() {
        let dir = tree();
        let report = build(&book(dir.path()), &FailingConverter, &SilentProgress).unwrap();

        match report.conversion {
            ConversionStatus::ConverterFailed { message } => {
                assert!(message.contains("unknown option"));
                assert!(message.contains("exit code 64"));
            }
            other => panic!("expected ConverterFailed, got {other:?}"),
        }
    }

    #[test]
    fn merge_errors_propagate_before_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("plain-file");
        fs::write(&not_a_dir, "x").unwrap();
        let config = book(&not_a_dir);
        let converter = CopyConverter::default();

        assert!(build(&config, &converter, &SilentProgress).is_err());
        assert!(converter.seen.lock().unwrap().is_empty());
    }
}
