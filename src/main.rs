//! poetryup - Update Poetry dependencies and bump their version in pyproject.toml

use clap::Parser;
use poetryup::cli::CliArgs;
use poetryup::error::AppError;
use poetryup::manifest::locate_manifest;
use poetryup::orchestrator::Orchestrator;
use poetryup::output::formatter_for;
use poetryup::package_manager::Poetry;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(&args);

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            let code = e
                .downcast_ref::<AppError>()
                .map(AppError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `-v`/`-q`
fn init_logging(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    args.validate().map_err(AppError::from)?;

    debug!("poetryup v{}", env!("CARGO_PKG_VERSION"));

    // Locate the manifest before touching poetry
    let manifest_path = locate_manifest(&args.path).map_err(AppError::from)?;
    let project_dir = manifest_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let poetry = Poetry::detect(&args.poetry, project_dir).map_err(AppError::from)?;

    let orchestrator = Orchestrator::from_cli(&args);
    let result = orchestrator.run(&manifest_path, &poetry)?;

    let formatter = formatter_for(&args, io::stdout().is_terminal());

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    // Non-fatal problems are reported in the output but keep a zero exit code
    Ok(ExitCode::SUCCESS)
}
