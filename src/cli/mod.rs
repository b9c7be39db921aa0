//! The gemini command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use crate::cli::args::{Command, GeminiArgs};
use crate::config::Config;
use crate::events::{Event, EventEmitter};
use crate::reader::{self, ReadOptions};
use crate::GeminiError;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub async fn run() {
    let args = GeminiArgs::parse();

    let result = match args.command {
        Command::List {
            paths,
            sets,
            json,
            verbose,
        } => handle_list(&args.config, paths, sets, json, verbose).await,
        Command::Sets => handle_sets(&args.config),
    };

    if let Err(e) = result {
        output::print_error(e);
        process::exit(1);
    }
}

/// Handles the `list` subcommand.
async fn handle_list(
    config_path: &Path,
    paths: Vec<PathBuf>,
    sets: Vec<String>,
    json: bool,
    verbose: bool,
) -> Result<(), GeminiError> {
    let config = Config::load(config_path)?;
    let options = ReadOptions {
        paths,
        sets: if sets.is_empty() { None } else { Some(sets) },
    };

    let mut emitter = EventEmitter::new();
    if verbose {
        emitter.on(Event::AfterFileRead, |path| output::print_file_read(path));
    }

    let root = reader::read_tests(&options, &config, &mut emitter).await?;
    if json {
        output::print_suite_json(&root)
    } else {
        output::print_suite_tree(&root);
        Ok(())
    }
}

/// Handles the `sets` subcommand.
fn handle_sets(config_path: &Path) -> Result<(), GeminiError> {
    let config = Config::load(config_path)?;
    for (name, set) in &config.sets {
        println!("{name}:");
        let files = if set.files.is_empty() {
            "(from command-line paths)".to_string()
        } else {
            set.files.join(", ")
        };
        println!("  files: {files}");
        let browsers = set
            .browsers
            .clone()
            .unwrap_or_else(|| config.browser_ids());
        println!("  browsers: {}", browsers.join(", "));
    }
    Ok(())
}
