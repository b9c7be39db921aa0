//! Unified error type for the gemini tool.
//!
//! Every user-visible failure is a [`GeminiError`]. Set resolution carries
//! its own error type ([`crate::sets::SetsError`]); the reader translates it
//! into the two normalized kinds (`Sets`, `Other`) at the build boundary,
//! and everything downstream of the build propagates untouched.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// All failure modes of the tool, tagged by origin.
#[derive(Debug, Error, Diagnostic)]
pub enum GeminiError {
    /// Domain failures surfaced by set resolution, message preserved.
    #[error("{message}")]
    #[diagnostic(code(gemini::sets))]
    Sets { message: String },

    /// A set was requested on the command line that no config declares.
    #[error("No such sets: {unknown}. Use one of the sets defined in config: {known}")]
    #[diagnostic(
        code(gemini::unknown_sets),
        help("check the `sets` section of your config file")
    )]
    UnknownSets { unknown: String, known: String },

    #[error("Failed to load config {}: {reason}", .path.display())]
    #[diagnostic(code(gemini::config))]
    Config { path: PathBuf, reason: String },

    #[error("Failed to read test file {}: {reason}", .path.display())]
    #[diagnostic(code(gemini::file_read))]
    FileRead { path: PathBuf, reason: String },

    #[error("Failed to parse test file {}: {reason}", .path.display())]
    #[diagnostic(code(gemini::parse))]
    Parse { path: PathBuf, reason: String },

    /// A test file defined a suite the tree cannot accept.
    #[error("Invalid suite {name:?} in {}: {reason}", .path.display())]
    #[diagnostic(code(gemini::suite))]
    InvalidSuite {
        name: String,
        path: PathBuf,
        reason: String,
    },

    /// Catch-all wrapper: only the message of the original failure survives.
    #[error("{message}")]
    #[diagnostic(code(gemini::other))]
    Other { message: String },
}
