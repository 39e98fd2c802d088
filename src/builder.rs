//! Builds the subject binary once before any case runs.

use crate::config::BuildConfig;
use crate::error::{Error, Result};
use std::process::{Command, Stdio};

/// Run the build command, writing the binary to `config.output`.
pub fn build(config: &BuildConfig) -> Result<()> {
    tracing::info!(
        source = %config.source_dir.display(),
        output = %config.output.display(),
        "building subject binary"
    );

    let output = Command::new(&config.program)
        .args(&config.args)
        .arg(&config.output)
        .current_dir(&config.source_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| Error::BuildSpawn {
            program: config.program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(Error::Build {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    tracing::debug!(output = %config.output.display(), "build finished");
    Ok(())
}
