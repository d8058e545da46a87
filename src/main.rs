//! API docs from source - Command-line tool for extracting API documentation.
//!
//! This binary scans a Rust project for controllers, extracts one documentation
//! record per controller and prints or writes them as YAML or JSON. Given the
//! output of a previous run, every request is classified as NEW, MODIFIED or
//! UNCHANGED.
//!
//! # Usage
//!
//! ```bash
//! apidocs-from-source [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! apidocs-from-source ./my-api-project -o apidocs.yaml
//! ```
//!
//! Compare against the previous release:
//! ```bash
//! apidocs-from-source ./my-api-project -f json -b previous.json -o apidocs.json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! apidocs-from-source ./my-api-project -v
//! ```

use anyhow::Result;
use apidocs_from_source::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse once to read the verbose flag before the logger exists
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("API docs extraction starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("API docs extraction completed successfully");

    Ok(())
}
