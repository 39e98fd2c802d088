//! Error types for the harness.
//!
//! Fatal setup errors abort the run before or between suites. Resource errors
//! come from handling a single case's script and are kept apart from test
//! outcomes so they are never mistaken for a failing case.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Setup errors ===
    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to start build command '{program}': {source}")]
    BuildSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Build failed with {status}: {stderr}")]
    Build { status: String, stderr: String },

    #[error("Failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    // === Resource errors ===
    #[error("Script error ({action} {}): {source}", .path.display())]
    Script {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to execute script {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn script(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Script {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Error type for spec loading operations.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported file format: {0} (expected .yaml, .yml, .toml or .json)")]
    UnsupportedFormat(String),
}
