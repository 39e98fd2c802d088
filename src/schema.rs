//! Schema definitions for suite spec files.
//!
//! A spec file holds one suite under the `suite` key. Specs are usually
//! written in YAML; TOML and JSON documents with the same shape are accepted.

use serde::Deserialize;

/// Root document for a spec file.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecFile {
    /// The suite defined in this file.
    pub suite: Suite,
}

/// An ordered collection of cases loaded from one spec file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Suite {
    /// Cases in declaration order.
    #[serde(default)]
    pub cases: Vec<Case>,
}

/// A single named test case.
///
/// Each command is shell text. Only `test` is executed; `setup` and `cleanup`
/// are acknowledged but not run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Case {
    /// Display label (not required to be unique).
    #[serde(default)]
    pub name: String,

    /// Command run before the test.
    #[serde(default)]
    pub setup: Option<String>,

    /// The command under test. May contain `%%...%%` tokens.
    #[serde(default)]
    pub test: Option<String>,

    /// Command run after the test.
    #[serde(default)]
    pub cleanup: Option<String>,
}
