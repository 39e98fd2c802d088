//! Ephemeral test scripts.
//!
//! Each test command is written to its own executable file and run through
//! `sh`, so authors get full shell semantics (pipes, `exit`, conditionals).

use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempPath;

/// Interpreter line written at the top of every script.
pub const SCRIPT_HEADER: &str = "#!/usr/bin/env bash\n\n";

/// A materialized script on disk.
///
/// The file is removed when this value is dropped, unless it has been
/// released through [`Script::finish`] with `keep` set.
#[derive(Debug)]
pub struct Script {
    path: TempPath,
}

impl Script {
    /// Write `command` to a new, uniquely named executable file in `dir`.
    pub fn materialize(dir: &Path, command: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("case-")
            .suffix(".sh")
            .rand_bytes(16)
            .tempfile_in(dir)
            .map_err(|e| Error::script("create", dir, e))?;

        let path = file.path().to_path_buf();
        write_script(file.as_file_mut(), command)
            .map_err(|e| Error::script("write", &path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o700))
                .map_err(|e| Error::script("chmod", &path, e))?;
        }

        // Closes the write handle; executing a file still open for writing
        // fails with ETXTBSY.
        let path = file.into_temp_path();
        tracing::debug!(path = %path.display(), "materialized script");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the script and capture its result.
    pub fn execute(&self) -> Result<ExecutionResult> {
        execute(&self.path)
    }

    /// Delete the script, or leave it on disk when `keep` is set.
    ///
    /// Returns the path of a kept script.
    pub fn finish(self, keep: bool) -> Result<Option<PathBuf>> {
        if keep {
            let path = self.path.keep().map_err(|e| {
                let path = e.path.to_path_buf();
                Error::script("keep", path, e.error)
            })?;
            tracing::info!(path = %path.display(), "kept script");
            return Ok(Some(path));
        }

        let path = self.path().to_path_buf();
        self.path
            .close()
            .map_err(|e| Error::script("delete", path, e))?;
        Ok(None)
    }
}

fn write_script(file: &mut std::fs::File, command: &str) -> std::io::Result<()> {
    file.write_all(SCRIPT_HEADER.as_bytes())?;
    file.write_all(command.as_bytes())?;
    file.flush()
}

/// Outcome of running one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit status; a signal-terminated process reports `128 + signal`.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Execute the script at `path` through `sh` and wait for it to finish.
///
/// A non-zero exit is a normal result, not an error. There is no timeout.
pub fn execute(path: &Path) -> Result<ExecutionResult> {
    let output = Command::new("sh")
        .arg("-c")
        .arg("\"$0\"")
        .arg(path)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| Error::Spawn {
            path: path.to_path_buf(),
            source,
        })?;

    let exit_code = match output.status.code() {
        Some(code) => code,
        None => signal_exit_code(&output.status),
    };
    tracing::debug!(path = %path.display(), exit_code, "script finished");

    Ok(ExecutionResult {
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(unix)]
fn signal_exit_code(status: &std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map_or(-1, |signal| 128 + signal)
}

#[cfg(not(unix))]
fn signal_exit_code(_status: &std::process::ExitStatus) -> i32 {
    -1
}
