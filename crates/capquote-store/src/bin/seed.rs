//! # Table Seeder
//!
//! Writes the starter table set into the configured table directory.
//!
//! ## Usage
//! ```bash
//! # Seed the directory from capquote.toml / CAPQUOTE_TABLE_DIR
//! cargo run -p capquote-store --bin seed
//!
//! # Overwrite tables that already exist
//! cargo run -p capquote-store --bin seed -- --force
//!
//! # Use a specific config file
//! cargo run -p capquote-store --bin seed -- --config ./capquote.toml
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use capquote_store::{default_tables, FileTableStore, StoreConfig, StoreResult};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

struct Args {
    config: Option<PathBuf>,
    force: bool,
    help: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        config: None,
        force: false,
        help: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--force" | "-f" => args.force = true,
            "--config" | "-c" => args.config = iter.next().map(PathBuf::from),
            "--help" | "-h" => args.help = true,
            other => warn!(arg = other, "Ignoring unknown argument"),
        }
    }
    args
}

fn print_help() {
    println!("capquote table seeder");
    println!();
    println!("Usage: seed [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Config file (default: platform config dir/capquote.toml)");
    println!("  -f, --force          Overwrite existing tables");
    println!("  -h, --help           Show this help message");
}

fn run(args: Args) -> StoreResult<()> {
    if args.help {
        print_help();
        return Ok(());
    }

    let config = StoreConfig::load(args.config)?;
    let store = FileTableStore::new(&config);

    if !args.force && store.load().is_ok() {
        warn!(dir = ?store.dir(), "Tables already present; pass --force to overwrite");
        return Ok(());
    }

    store.write_snapshot(&default_tables())?;
    info!(dir = ?store.dir(), "Seeded pricing tables");
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run(parse_args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Seeding failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
