//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use yearbook_core::converter::PandocConverter;
use yearbook_core::pipeline::{BuildConfig, ConversionStatus, ProgressReporter};
use yearbook_shared::{BookConfig, CONFIG_FILE_NAME, init_config, load_config_for};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// yearbook — merge year-organized markdown into one book.
#[derive(Parser)]
#[command(
    name = "yearbook",
    version,
    about = "Merge YYYY/*.md sources into one markdown document and build an e-book from it.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to <base>/yearbook.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Merge all year groups into a single markdown document.
    Merge {
        /// Directory holding the YYYY/ groups.
        #[arg(short, long, default_value = ".")]
        base: PathBuf,

        /// Output file (defaults to <base>/merged/merged.md).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Book title; switches to the titled book layout.
        #[arg(short, long)]
        title: Option<String>,

        /// Skip page breaks in the book layout.
        #[arg(long)]
        no_page_breaks: bool,
    },

    /// Merge in book layout, then run the converter to produce the e-book.
    Build {
        /// Directory holding the YYYY/ groups.
        #[arg(short, long, default_value = ".")]
        base: PathBuf,
    },

    /// List discovered year groups and their markdown files.
    List {
        /// Directory holding the YYYY/ groups.
        #[arg(short, long, default_value = ".")]
        base: PathBuf,

        /// Print JSON instead of a tree.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init {
        /// Directory the config belongs to.
        #[arg(short, long, default_value = ".")]
        base: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Show resolved configuration.
    Show {
        /// Directory the config belongs to.
        #[arg(short, long, default_value = ".")]
        base: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so that stdout
/// stays clean for `list --json`.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "yearbook=info",
        1 => "yearbook=debug",
        _ => "yearbook=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Merge {
            base,
            out,
            title,
            no_page_breaks,
        } => cmd_merge(&base, config_path, out, title, no_page_breaks),
        Command::Build { base } => cmd_build(&base, config_path),
        Command::List { base, json } => cmd_list(&base, json),
        Command::Config { action } => match action {
            ConfigAction::Init { base, force } => cmd_config_init(&base, config_path, force),
            ConfigAction::Show { base } => cmd_config_show(&base, config_path),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_merge(
    base: &Path,
    config_path: Option<&Path>,
    out: Option<PathBuf>,
    title: Option<String>,
    no_page_breaks: bool,
) -> Result<ExitCode> {
    let mut config = load_config_for(base, config_path)?;
    if title.is_some() {
        config.merge.title = title;
    }
    if no_page_breaks {
        config.merge.page_breaks = false;
    }

    let mut merge_config = config.merge_config(base);
    if let Some(out) = out {
        merge_config.output_path = out;
    }

    info!(base = %base.display(), "merging year groups");

    let reporter = CliProgress::new();
    let result = yearbook_core::merger::merge(&merge_config, &reporter);
    reporter.done();
    let report = result?;

    println!(
        "Merged {} files from {} years into {}",
        report.file_count,
        report.year_count,
        report.output_path.display()
    );
    println!("  Size:   {} bytes", report.size_bytes);
    println!("  SHA256: {}", report.sha256);

    Ok(ExitCode::SUCCESS)
}

fn cmd_build(base: &Path, config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config_for(base, config_path)?;

    let build_config = BuildConfig {
        merge: config.book_merge_config(base),
        convert: config.convert_config(base),
    };

    info!(
        base = %base.display(),
        program = %build_config.convert.program,
        "building e-book"
    );

    let reporter = CliProgress::new();
    let report = yearbook_core::pipeline::build(&build_config, &PandocConverter, &reporter)?;

    println!(
        "Merged {} files from {} years into {}",
        report.merge.file_count,
        report.merge.year_count,
        report.merge.output_path.display()
    );

    match &report.conversion {
        ConversionStatus::Succeeded { artifact } => {
            println!();
            println!("  E-book created successfully!");
            println!("  Path:   {}", artifact.display());
            println!("  Time:   {:.1}s", report.elapsed.as_secs_f64());
            println!();
        }
        ConversionStatus::ConverterNotFound { program } => {
            eprintln!("converter not found: '{program}' is not on PATH");
            eprintln!("  Install it or set [convert].program in {CONFIG_FILE_NAME}.");
        }
        ConversionStatus::ConverterFailed { message } => {
            eprintln!("converter failed: {message}");
        }
    }

    if report.conversion.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn cmd_list(base: &Path, json: bool) -> Result<ExitCode> {
    let groups = yearbook_discovery::discover(base)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(ExitCode::SUCCESS);
    }

    if groups.is_empty() {
        println!("No year groups found under {}", base.display());
        return Ok(ExitCode::SUCCESS);
    }

    for group in &groups {
        println!("{} ({} files)", group.year, group.file_count());
        for file in &group.files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            println!("  {name}");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_config_init(base: &Path, config_path: Option<&Path>, force: bool) -> Result<ExitCode> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base.join(CONFIG_FILE_NAME));

    if path.exists() && !force {
        return Err(eyre!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let path = init_config(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_show(base: &Path, config_path: Option<&Path>) -> Result<ExitCode> {
    let config: BookConfig = load_config_for(base, config_path)?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn year_merged(&self, year: &str, files: usize) {
        self.spinner.set_message(format!("Merged {year} ({files} files)"));
    }

    fn done(&self) {
        self.spinner.finish_and_clear();
    }
}
