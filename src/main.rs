/*!
 * Command-line interface for wpr
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wpr::config::{Args, Config, Mode};
use wpr::report::{ReportFormat, Reporter};
use wpr::{app, install, TerminalPrompter};

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok(), args.verbose);
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();

    // Generate shell completions and exit
    if let Some(shell) = args.generate {
        let mut command = Args::command();
        clap_complete::generate(shell, &mut command, "wpr", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = Config::from_args(args);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// RUST_LOG is used as given when set; --verbose raises it to DEBUG.
/// Without RUST_LOG the level is DEBUG with --verbose and WARN otherwise.
fn log_filter(rust_log: Option<String>, verbose: bool) -> EnvFilter {
    match rust_log.map(EnvFilter::try_new) {
        Some(Ok(filter)) if verbose => filter.add_directive(Level::DEBUG.into()),
        Some(Ok(filter)) => filter,
        _ if verbose => EnvFilter::default().add_directive(Level::DEBUG.into()),
        _ => EnvFilter::default().add_directive(Level::WARN.into()),
    }
}

fn run(config: &Config) -> wpr::Result<()> {
    match config.mode {
        Mode::Install => {
            let link = install::install(&config.bin_dir)?;
            println!("Installed {}", link.display());
            return Ok(());
        }
        Mode::Uninstall => {
            let link = install::uninstall(&config.bin_dir)?;
            println!("Removed {}", link.display());
            return Ok(());
        }
        Mode::Init => {
            config.validate()?;
            let path = install::init_config(&config.target_dir)?;
            println!("Created {}", path.display());
            return Ok(());
        }
        Mode::Bundle => {}
    }

    // Validate configuration
    config.validate()?;

    // Spinner while the tree is walked
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress.set_prefix("📂 Scanning");
    progress.set_message(config.target_dir.display().to_string());

    let mut prompter = TerminalPrompter::default();
    let report = app::bundle(config, &mut prompter, Arc::new(progress.clone()));
    progress.finish_and_clear();
    let report = report?;

    // Create a reporter and print the report
    let reporter = Reporter::new(ReportFormat::ConsoleTable);
    reporter.print_report(&report);

    Ok(())
}
