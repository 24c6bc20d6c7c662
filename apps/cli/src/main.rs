//! yearbook CLI — merge year-organized markdown into a single book.
//!
//! Concatenates `YYYY/*.md` sources into one markdown document and hands it
//! to an external converter to produce an e-book.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
