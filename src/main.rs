//! RAM file store - Entry Point
//!
//! Runs store commands from a script file, from stdin (`-`), or the built-in
//! demonstration when no argument is given.

use log::{error, info};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use ramfs_store::commands::{DEMO_SCRIPT, run_script};
use ramfs_store::utils::logging::setup_logging;
use ramfs_store::{PathStore, StoreConfig};

fn main() -> ExitCode {
    setup_logging();

    let config = match StoreConfig::load(None) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Starting RAM store ({} entries, paths < {} bytes, content < {} bytes)",
        config.max_entries, config.max_path_len, config.max_content_len
    );

    let mut store = PathStore::new(config);
    let stdout = io::stdout();

    let result = match env::args().nth(1).as_deref() {
        None => run_script(&mut store, DEMO_SCRIPT.as_bytes(), stdout.lock()),
        Some("-") => run_script(&mut store, io::stdin().lock(), stdout.lock()),
        Some(path) => File::open(path)
            .and_then(|file| run_script(&mut store, BufReader::new(file), stdout.lock())),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("I/O error while running commands: {}", e);
            ExitCode::FAILURE
        }
    }
}
