//! Command line surface of the `harness` binary

use crate::checks::register_builtin_checks;
use crate::error::HarnessResult;
use crate::registry::{TestRegistry, TestSummary};
use crate::report::ReportFormat;
use clap::{Args, Parser, Subcommand};
use logger::LoggerConfig;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "harness")]
#[command(about = "Run the logger self-check suite")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run every registered check and print the report
    Run(RunArgs),
    /// List the registered checks
    List,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// TOML file with logger settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Append log lines to this file (overrides the config file)
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,
    /// Disable ANSI colors on the console
    #[arg(long)]
    pub no_color: bool,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// The config file (or defaults) with the command line flags applied on top
    pub fn logger_config(&self) -> HarnessResult<LoggerConfig> {
        let mut config = match &self.config {
            Some(path) => LoggerConfig::load(path)?,
            None => LoggerConfig::default(),
        };
        if let Some(path) = &self.log_file {
            config = config.with_log_file(path);
        }
        if self.no_color {
            config = config.with_color(false);
        }
        Ok(config)
    }

    pub fn report_format(&self) -> ReportFormat {
        if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        }
    }
}

/// Process exit status for a finished run: 0 when everything passed, else 1
pub fn exit_status(summary: &TestSummary) -> u8 {
    if summary.all_passed() {
        0
    } else {
        1
    }
}

pub fn list_checks<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    let mut registry = TestRegistry::new();
    register_builtin_checks(&mut registry);

    writeln!(out, "Registered checks:")?;
    for name in registry.names() {
        writeln!(out, "  {}", name)?;
    }
    Ok(())
}
