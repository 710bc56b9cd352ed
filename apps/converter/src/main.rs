mod logging;

use clap::{command, Parser};
use haven_pipeline::config::{ConvertConfig, FailurePolicy};
use haven_pipeline::Pipeline;
use logging::ConsoleLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct CLI {
    /// Comma-separated list of texture names from PolyHaven
    textures: String,

    /// Root directory the materials tree is written under
    #[arg(long)]
    root: Option<PathBuf>,

    /// Path to the VTF compiler executable
    #[arg(long)]
    compiler: Option<PathBuf>,

    /// Stop the batch at the first texture that fails to convert
    #[arg(long)]
    abort_on_error: bool,
}

fn main() {
    // Initialize the logger
    log::set_logger(&ConsoleLogger).unwrap();
    log::set_max_level(log::LevelFilter::Debug);

    let cli = CLI::parse();

    let mut config = ConvertConfig::default();
    if let Some(root) = cli.root {
        config.materials_root = root;
    }
    if let Some(compiler) = cli.compiler {
        config.compiler_path = compiler;
    }
    if cli.abort_on_error {
        config.failure_policy = FailurePolicy::AbortOnFirstError;
    }

    let textures: Vec<String> = cli
        .textures
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if textures.is_empty() {
        log::error!("No texture identifiers given");
        std::process::exit(2);
    }

    let pipeline = Pipeline::new(config).unwrap_or_else(|err| {
        log::error!("Failed to set up the pipeline: {}", err);
        std::process::exit(1);
    });

    let report = pipeline.run_batch(&textures);
    report.log_summary();
    if !report.all_ok() {
        std::process::exit(1);
    }
}
