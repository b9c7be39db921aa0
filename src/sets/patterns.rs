//! Glob-style pattern support for file masks and exclusions.
//!
//! Supported syntax: `**` matches across path separators, `*` within a
//! single segment, `?` a single character, `[...]` is passed through as a
//! character class. Patterns are anchored to the whole `/`-separated path.

use std::path::Path;

use regex::Regex;

use crate::sets::SetsError;

/// True when a mask needs expansion instead of a plain filesystem lookup.
pub(crate) fn is_glob(mask: &str) -> bool {
    mask.contains(['*', '?', '['])
}

/// Compiles a glob pattern into an anchored regex.
pub(crate) fn compile(pattern: &str) -> Result<Regex, SetsError> {
    let mut re = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        // `**/` also matches zero directories
                        chars.next();
                        re.push_str("(?:.*/)?");
                    } else {
                        re.push_str(".*");
                    }
                } else {
                    re.push_str("[^/]*");
                }
            }
            '?' => re.push_str("[^/]"),
            '[' => {
                re.push('[');
                for inner in chars.by_ref() {
                    re.push(inner);
                    if inner == ']' {
                        break;
                    }
                }
            }
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re)
        .map_err(|e| SetsError::General(format!("Invalid pattern '{}': {}", pattern, e)))
}

/// Renders a path with `/` separators for pattern matching.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Matches root-relative paths against a list of exclusion patterns.
pub(crate) struct ExcludeMatcher {
    patterns: Vec<Regex>,
}

impl ExcludeMatcher {
    pub(crate) fn new(patterns: &[String]) -> Result<Self, SetsError> {
        let patterns = patterns
            .iter()
            .map(|p| compile(p.trim_end_matches('/')))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True when the path, or any ancestor of it, matches a pattern, so a
    /// bare directory name excludes its whole subtree.
    pub(crate) fn is_excluded(&self, rel: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let text = to_slash(rel);
        self.patterns
            .iter()
            .any(|re| re.is_match(&text) || ancestors(&text).any(|prefix| re.is_match(prefix)))
    }
}

fn ancestors(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices('/').map(move |(i, _)| &text[..i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_stays_within_a_segment() {
        let re = compile("*.yaml").unwrap();
        assert!(re.is_match("button.yaml"));
        assert!(!re.is_match("nested/button.yaml"));
        assert!(!re.is_match("button.yml"));
    }

    #[test]
    fn double_star_crosses_segments() {
        let re = compile("**/skip/**").unwrap();
        assert!(re.is_match("skip/a.yaml"));
        assert!(re.is_match("deep/skip/a.yaml"));
        assert!(!re.is_match("deep/kept/a.yaml"));
    }

    #[test]
    fn question_mark_matches_one_character() {
        let re = compile("page-?.yaml").unwrap();
        assert!(re.is_match("page-1.yaml"));
        assert!(!re.is_match("page-10.yaml"));
    }

    #[test]
    fn character_class_passes_through() {
        let re = compile("page-[0-9].yaml").unwrap();
        assert!(re.is_match("page-3.yaml"));
        assert!(!re.is_match("page-x.yaml"));
    }

    #[test]
    fn unclosed_class_is_rejected() {
        let err = compile("page-[0-9.yaml").unwrap_err();
        assert!(err.to_string().contains("Invalid pattern"));
    }

    #[test]
    fn bare_directory_name_excludes_subtree() {
        let matcher = ExcludeMatcher::new(&["node_modules".to_string()]).unwrap();
        assert!(matcher.is_excluded(Path::new("node_modules/pkg/test.yaml")));
        assert!(matcher.is_excluded(Path::new("node_modules")));
        assert!(!matcher.is_excluded(Path::new("gemini/test.yaml")));
    }

    #[test]
    fn empty_matcher_excludes_nothing() {
        let matcher = ExcludeMatcher::new(&[]).unwrap();
        assert!(!matcher.is_excluded(Path::new("anything/at/all.yaml")));
    }
}
