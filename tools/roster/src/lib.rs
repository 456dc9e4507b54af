pub mod config;
pub mod console;
pub mod errors;
pub mod fsm;
pub mod input;
pub mod log_retention;
pub mod logging;
pub mod menu;
pub mod record_store;
pub mod runtime;
pub mod types;

use clap::{error::ErrorKind, Parser};
use config::{load_config, CliOverrides};
use console::ConsoleLoop;
use errors::RosterError;
use logging::JsonlLogger;
use record_store::RecordStore;
use runtime::ProductionRuntime;

#[derive(Debug, Clone, Parser)]
#[command(name = "roster")]
#[command(version)]
#[command(about = "Interactive in-memory name/age record manager")]
pub struct Cli {
    /// TOML file layered over the built-in defaults
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,
    /// Maximum number of records for this session (1-100)
    #[arg(long)]
    pub capacity: Option<usize>,
    /// Append structured JSONL events to this file
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}

pub fn run() -> Result<i32, RosterError> {
    let args = std::env::args_os().collect::<Vec<_>>();
    let runtime = ProductionRuntime::new();
    run_with_runtime(&args, &runtime)
}

pub fn run_with_runtime(
    args: &[std::ffi::OsString],
    runtime: &ProductionRuntime,
) -> Result<i32, RosterError> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{error}");
                return Ok(0);
            }
            _ => return Err(RosterError::Cli(error.to_string())),
        },
    };

    let overrides = CliOverrides {
        config_path: cli.config,
        capacity: cli.capacity,
        log_file: cli.log_file,
    };
    let cfg = load_config(&overrides, runtime.file_system.as_ref())?;

    let store = RecordStore::with_capacity(cfg.store.capacity)?;
    let logger = JsonlLogger::from_config(&cfg.logging);
    let mut console = ConsoleLoop::new(runtime.console.as_ref(), store).with_logger(logger.as_ref());
    console.run()?;

    Ok(0)
}
