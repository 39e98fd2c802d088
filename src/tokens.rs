//! Placeholder tokens injected into test commands.
//!
//! A test command may reference the built binary and two shell predicates by
//! `%%name%%` placeholders. The table is built once per run and only read
//! afterwards.

use std::path::Path;

/// Replaced by the absolute path of the built subject binary.
pub const BINARY_TOKEN: &str = "%%human%%";

/// Marks a case whose command is expected to exit with status 1.
pub const SHOULD_FAIL_TOKEN: &str = "%%should-fail%%";

/// Checks piped output for a "not implemented yet" notice at line start.
pub const NOT_IMPLEMENTED_TOKEN: &str = "%%not-implemented%%";

/// Succeeds only if the previous command exited with status 1.
const SHOULD_FAIL_PREDICATE: &str = "test $? -eq 1";

const NOT_IMPLEMENTED_PREDICATE: &str = "grep -iqE '^not implemented yet'";

#[derive(Debug, Clone)]
struct Token {
    key: String,
    value: String,
}

/// Ordered mapping from placeholder literal to replacement text.
#[derive(Debug, Clone)]
pub struct TokenTable {
    entries: Vec<Token>,
}

impl TokenTable {
    /// Build the standard table for a run against `binary`.
    pub fn new(binary: &Path) -> Self {
        let entries = [
            (BINARY_TOKEN, binary.display().to_string()),
            (SHOULD_FAIL_TOKEN, SHOULD_FAIL_PREDICATE.to_string()),
            (NOT_IMPLEMENTED_TOKEN, NOT_IMPLEMENTED_PREDICATE.to_string()),
        ]
        .into_iter()
        .map(|(key, value)| Token {
            key: key.to_string(),
            value,
        })
        .collect();
        Self { entries }
    }

    /// Replace every token occurrence in `command`.
    ///
    /// Scans left to right over the original text only, so replacement values
    /// are never re-expanded. When two keys start at the same offset the one
    /// earlier in the table wins.
    pub fn substitute(&self, command: &str) -> String {
        let mut out = String::with_capacity(command.len());
        let mut rest = command;

        while let Some((at, token)) = self.next_match(rest) {
            out.push_str(&rest[..at]);
            out.push_str(&token.value);
            rest = &rest[at + token.key.len()..];
        }
        out.push_str(rest);
        out
    }

    fn next_match(&self, haystack: &str) -> Option<(usize, &Token)> {
        self.entries
            .iter()
            .filter_map(|t| haystack.find(&t.key).map(|at| (at, t)))
            .min_by_key(|(at, _)| *at)
    }
}

/// Whether a raw, unsubstituted command declares that it should fail.
pub fn expects_failure(raw_command: &str) -> bool {
    raw_command.contains(SHOULD_FAIL_TOKEN)
}
