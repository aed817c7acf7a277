mod demo;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};
use testbed_core::config::ConfigFormat;
use testbed_core::kernel::constants::{APP_NAME, APP_VERSION, DEFAULT_CONFIG_FILE};
use testbed_core::HarnessConfig;

/// testbed: a test-module lifecycle harness
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Print "pong" and exit
    #[arg(long)]
    ping: bool,

    /// Log filter directives, e.g. "debug" or "testbed_core=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a harness config file and print the effective settings
    CheckConfig {
        /// Path to a .json, .yaml/.yml or .toml file
        path: PathBuf,
    },
    /// Run the built-in demonstration suite
    Demo {
        /// Harness config to run with; defaults to ./testbed.toml when present
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: &Path) -> Result<HarnessConfig, String> {
    HarnessConfig::load(path).map_err(|e| format!("Failed to load '{}': {}", path.display(), e))
}

fn check_config(path: &Path) -> ExitCode {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    match config.to_string_with_format(ConfigFormat::Json) {
        Ok(rendered) => {
            println!("Config OK: {}", path.display());
            println!("{}", rendered);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to render config: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_demo(config_path: Option<PathBuf>) -> ExitCode {
    let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    let config = match config_path {
        Some(path) => load_config(&path),
        None if default_path.exists() => load_config(&default_path),
        None => Ok(HarnessConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut suite = match demo::build_suite(config) {
        Ok(suite) => suite,
        Err(e) => {
            error!("Failed to define the demo suite: {}", e);
            eprintln!("Failed to define the demo suite: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = suite.run().await;
    for test in &report.tests {
        println!("{}", test);
    }
    println!("{}", report.summary());

    if report.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    if let Err(e) = logging::init_logging(args.log_level.as_deref()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    info!("{} v{} starting", APP_NAME, APP_VERSION);

    match args.command {
        Some(Commands::CheckConfig { path }) => check_config(&path),
        Some(Commands::Demo { config }) => run_demo(config).await,
        None => {
            println!("{} v{}: run `{} --help` for usage", APP_NAME, APP_VERSION, APP_NAME);
            ExitCode::SUCCESS
        }
    }
}
