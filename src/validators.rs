//! Pre-build validation of reader inputs.

use crate::GeminiError;

/// Checks that every requested set name is declared in config.
///
/// Runs before any set building, so a bad name fails fast with the full
/// list of declared names in the message.
pub fn validate_unknown_sets(known: &[&str], requested: &[String]) -> Result<(), GeminiError> {
    let unknown: Vec<&str> = requested
        .iter()
        .map(String::as_str)
        .filter(|name| !known.contains(name))
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(GeminiError::UnknownSets {
            unknown: unknown.join(", "),
            known: known.join(", "),
        })
    }
}
