//! Sentinel root — process entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI flags
//!   3. Init logger (CLI `-v` flags > RUST_LOG > SENTINEL_LOG_LEVEL > warn)
//!   4. Load and validate config
//!   5. Print the config summary, or the failure report and exit 1

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use sentinel::config;
use sentinel::error::AppError;
use sentinel::logger;
use sentinel::report;
use tracing::{error, info, warn};

fn main() {
    if let Err(e) = run() {
        error!(error = %e, "startup failed");
        match &e {
            AppError::Config(err) => match report::render(err) {
                Some(text) => {
                    print!("{text}");
                    let _ = io::stdout().flush();
                }
                None => eprintln!("error: {e}"),
            },
            _ => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let env_level = env::var(logger::LEVEL_ENV_VAR).ok();
    let env_level = match env_level.as_deref().map(|l| (l, logger::parse_level(l))) {
        Some((level, Ok(_))) => Some(level.to_string()),
        Some((_, Err(e))) => {
            // Logger is not up yet, so report on stderr directly.
            eprintln!("warning: ignoring {}: {e}", logger::LEVEL_ENV_VAR);
            None
        }
        None => None,
    };

    let effective_log_level = args
        .log_level
        .or(env_level.as_deref())
        .unwrap_or(logger::DEFAULT_LEVEL);
    logger::init(effective_log_level, args.log_level.is_some())?;

    let config = config::load(args.config_path.as_deref())?;

    info!(
        root_server = %config.root_server(),
        nodes = config.node_servers().len(),
        mode = %config.mode(),
        "config loaded"
    );
    if config.node_servers().is_empty() {
        warn!("no node servers configured");
    }

    let mut out = io::stdout().lock();
    write!(out, "{config}")?;
    out.flush()?;

    Ok(())
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<PathBuf>,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: sentinel [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: ./config.toml, or $SENTINEL_CONFIG)");
                println!("  -v, -vv, -vvv              Increase logging verbosity");
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => {}
        }
    }

    CliArgs {
        log_level: logger::level_for_verbosity(verbosity),
        config_path,
    }
}
