//! Defines the command-line arguments and subcommands for the gemini CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "gemini",
    version,
    about = "A utility for visual regression testing of web pages."
)]
pub struct GeminiArgs {
    /// Path to the config file.
    #[arg(short, long, global = true, default_value = ".gemini.yml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover test files and print the suite tree.
    List {
        /// Paths to read tests from instead of the configured sets.
        paths: Vec<PathBuf>,
        /// Restrict the run to the named set (repeatable).
        #[arg(long = "set", value_name = "NAME")]
        sets: Vec<String>,
        /// Print the tree as JSON.
        #[arg(long)]
        json: bool,
        /// Print each file as it is read.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the sets declared in the config file.
    Sets,
}
