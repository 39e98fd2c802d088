//! Harness configuration.
//!
//! Built once at startup from the environment and the optional `e2e.yaml`
//! file in the subject's source directory, then passed by reference.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root for the built binary and every materialized script.
pub const TMP_DIR_VAR: &str = "E2E_TMP_DIR";

/// When present, materialized scripts are left on disk.
pub const NO_CLEANUP_VAR: &str = "E2E_NO_CLEANUP";

/// Filter directive for diagnostic logging.
pub const LOG_VAR: &str = "E2E_LOG";

/// The name of the harness configuration file.
pub const HARNESS_CONFIG_FILENAME: &str = "e2e.yaml";

/// Settings read from `e2e.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarnessFile {
    /// File name of the built subject binary.
    pub binary: String,

    /// Build command; the binary output path is appended as the last argument.
    pub build: Vec<String>,
}

impl Default for HarnessFile {
    fn default() -> Self {
        Self {
            binary: "human".to_string(),
            build: vec!["go".to_string(), "build".to_string(), "-o".to_string()],
        }
    }
}

/// How to produce the subject binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory for the build.
    pub source_dir: PathBuf,
    /// Where the build must write the executable.
    pub output: PathBuf,
}

/// Effective configuration for one harness run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory holding the binary and materialized scripts.
    pub tmp_dir: PathBuf,
    /// Keep materialized scripts after each case.
    pub no_cleanup: bool,
    pub build: BuildConfig,
}

impl HarnessConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var_os(name).map(PathBuf::from))
    }

    /// Read configuration through `lookup`, which resolves environment names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let tmp_dir = lookup(TMP_DIR_VAR).ok_or(Error::MissingEnv(TMP_DIR_VAR))?;
        let tmp_dir = std::path::absolute(&tmp_dir).map_err(|e| {
            Error::Config(format!("cannot resolve {}: {e}", tmp_dir.display()))
        })?;
        let no_cleanup = lookup(NO_CLEANUP_VAR).is_some();

        let source_dir = source_dir_for(&tmp_dir)?;
        let file = load_harness_file(&source_dir)?;
        let (program, args) = file
            .build
            .split_first()
            .ok_or_else(|| Error::Config("build command is empty".to_string()))?;
        if file.binary.is_empty() {
            return Err(Error::Config("binary name is empty".to_string()));
        }

        let build = BuildConfig {
            program: program.clone(),
            args: args.to_vec(),
            output: tmp_dir.join(&file.binary),
            source_dir,
        };

        Ok(Self {
            tmp_dir,
            no_cleanup,
            build,
        })
    }

    /// Absolute path of the built subject binary.
    pub fn binary_path(&self) -> &Path {
        &self.build.output
    }
}

/// The subject's source tree sits two levels above the temp directory.
fn source_dir_for(tmp_dir: &Path) -> Result<PathBuf> {
    tmp_dir
        .ancestors()
        .nth(2)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            Error::Config(format!(
                "{TMP_DIR_VAR} must be nested two levels inside the source directory, got {}",
                tmp_dir.display()
            ))
        })
}

/// Load `e2e.yaml` from a directory.
///
/// Returns defaults if the file doesn't exist, `Err` if it exists but is invalid.
fn load_harness_file(dir: &Path) -> Result<HarnessFile> {
    let path = dir.join(HARNESS_CONFIG_FILENAME);
    if !path.exists() {
        return Ok(HarnessFile::default());
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    serde_yaml::from_str(&contents)
        .map_err(|e| Error::Config(format!("invalid {}: {e}", path.display())))
}
