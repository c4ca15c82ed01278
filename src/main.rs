mod compiler;
mod conan;
mod logging;
mod project;
mod sync;
mod vscode;

#[cfg(test)]
mod test_utils;

use clap::Parser;
use logging::{LogConfig, init_logging};
use project::{BuildDirectory, discover_build_directories};
use sync::{ConfigSynthesizer, SyncError};
use vscode::SyncOutcome;

use std::path::{Path, PathBuf};
use tracing::info;

/// CLI arguments for the IntelliSense configuration updater
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workspace root directory to scan for build directories (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    workspace_root: Option<PathBuf>,

    /// Specific build directory to process instead of discovery
    #[arg(long, value_name = "DIR")]
    build_dir: Option<PathBuf>,

    /// Log level (overrides RUST_LOG env var)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log file path (overrides SYNC_LOG_FILE env var)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Run the synchronization pipeline for one workspace.
fn run(workspace_root: &Path, build_dir_override: Option<PathBuf>) -> Result<SyncOutcome, SyncError> {
    let synthesizer = ConfigSynthesizer::new(workspace_root)?;

    if !vscode::ensure_cmake_tools(synthesizer.vscode_dir()) {
        return Err(SyncError::CmakeToolsUnavailable);
    }

    let build_dirs = match build_dir_override {
        Some(dir) => BuildDirectory::from_override(&dir),
        None => discover_build_directories(workspace_root),
    };

    if build_dirs.is_empty() {
        return Err(SyncError::NoBuildDirectories {
            path: workspace_root.display().to_string(),
        });
    }

    info!(
        "Processing {} build director{} under {}",
        build_dirs.len(),
        if build_dirs.len() == 1 { "y" } else { "ies" },
        workspace_root.display()
    );

    synthesizer.run(&build_dirs)
}

fn main() {
    let args = Args::parse();

    // Initialize logging with configuration from env vars and CLI args
    let log_config = LogConfig::from_env().with_overrides(args.log_level, args.log_file);
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    // Resolve workspace root directory
    let workspace_root = args.workspace_root.unwrap_or_else(|| {
        std::env::current_dir().unwrap_or_else(|e| {
            eprintln!("Failed to get current directory: {e}");
            std::process::exit(1);
        })
    });

    // Exit contract: 0 = document updated, 1 = fatal, 2 = no changes (no-op success)
    let exit_code = match run(&workspace_root, args.build_dir) {
        Ok(SyncOutcome::Updated { entries }) => {
            info!("Configuration updated successfully ({entries} entries)");
            0
        }
        Ok(SyncOutcome::Unchanged) => 2,
        Ok(SyncOutcome::NoConfigurations) => {
            eprintln!("Warning: No build configurations found. Run CMake configure first.");
            1
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };

    std::process::exit(exit_code);
}
