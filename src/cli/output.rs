//! Handles all user-facing output for the CLI.
//!
//! Centralizes suite-tree printing, colorized summaries, JSON output and
//! error reports so every command behaves the same way.

use std::io::Write;
use std::path::Path;

use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::suite::Suite;
use crate::GeminiError;

fn stdout() -> StandardStream {
    let choice = if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Prints the discovered tree, one suite per line, states indented under
/// their suite, followed by a summary line.
pub fn print_suite_tree(root: &Suite) {
    let mut out = stdout();
    for child in &root.children {
        print_suite(&mut out, child, 0);
    }
    println!();
    println!("{} suites, {} states", root.suite_count(), root.state_count());
}

fn print_suite(out: &mut StandardStream, suite: &Suite, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = out.set_color(ColorSpec::new().set_bold(true));
    let _ = write!(out, "{}{}", indent, suite.name);
    let _ = out.reset();
    if suite.skipped {
        let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
        let _ = write!(out, " (skipped)");
        let _ = out.reset();
    }
    let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
    let _ = writeln!(out, " [{}]", suite.browsers.join(", "));
    let _ = out.reset();
    for state in &suite.states {
        let _ = writeln!(out, "{}  - {}", indent, state.name);
    }
    for child in &suite.children {
        print_suite(out, child, depth + 1);
    }
}

/// Prints the tree as JSON on stdout.
pub fn print_suite_json(root: &Suite) -> Result<(), GeminiError> {
    let json = serde_json::to_string_pretty(root).map_err(|e| GeminiError::Other {
        message: e.to_string(),
    })?;
    println!("{json}");
    Ok(())
}

/// Progress line for a loaded file, used by `--verbose`.
pub fn print_file_read(path: &Path) {
    let mut out = stdout();
    let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
    let _ = write!(out, "read");
    let _ = out.reset();
    let _ = writeln!(out, " {}", path.display());
}

/// Prints a failure with full miette diagnostics.
pub fn print_error(error: GeminiError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}
