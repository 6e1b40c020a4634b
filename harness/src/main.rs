use clap::Parser;
use harness::cli::{exit_status, list_checks, Cli, Commands};
use harness::{register_builtin_checks, Context, ReportFormat};
use logger::{LoggerConfig, SinkLayer};
use std::io;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(&args.logger_config()?, args.report_format()),
        Commands::List => {
            list_checks(&mut io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run(
    config: &LoggerConfig,
    format: ReportFormat,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut context = Context::from_config(config)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(SinkLayer::new(context.shared_sink()))
        .init();

    register_builtin_checks(context.registry_mut());
    info!(checks = context.registry().count(), "starting self-check run");

    let summary = context.run_and_report();
    context.finish(&summary, format, &mut io::stdout().lock())?;

    Ok(ExitCode::from(exit_status(&summary)))
}
