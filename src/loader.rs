//! Spec file loader.
//!
//! Loads and parses suite specification files from disk.

use crate::config::HARNESS_CONFIG_FILENAME;
use crate::error::{Error, LoadError, Result};
use crate::schema::{SpecFile, Suite};
use std::path::{Path, PathBuf};

/// Load the suite defined in a spec file.
pub fn load_suite(path: &Path) -> Result<Suite> {
    let spec = load_spec(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        cases = spec.suite.cases.len(),
        "loaded suite"
    );
    Ok(spec.suite)
}

/// Load a spec document, choosing the parser by file extension.
pub fn load_spec(path: &Path) -> std::result::Result<SpecFile, LoadError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let contents = std::fs::read_to_string(path)?;

    match ext {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&contents)?),
        "toml" => Ok(toml::from_str(&contents)?),
        "json" => Ok(serde_json::from_str(&contents)?),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

/// Expand the command-line paths into spec files, preserving argument order.
///
/// Files are taken as given. Directories expand to their spec files, sorted.
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut specs = Vec::new();
    for path in paths {
        let found = find_specs(path).map_err(|source| Error::Load {
            path: path.clone(),
            source: LoadError::Io(source),
        })?;
        specs.extend(found);
    }
    Ok(specs)
}

/// Find all spec files in a directory or return the single file.
pub fn find_specs(path: &Path) -> std::result::Result<Vec<PathBuf>, std::io::Error> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut specs = Vec::new();
    collect_specs_recursive(path, &mut specs)?;
    specs.sort();
    Ok(specs)
}

fn collect_specs_recursive(dir: &Path, specs: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_specs_recursive(&path, specs)?;
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str())
            && matches!(ext, "yaml" | "yml" | "toml" | "json")
        {
            if path
                .file_name()
                .is_some_and(|f| f == HARNESS_CONFIG_FILENAME)
            {
                continue;
            }
            specs.push(path);
        }
    }
    Ok(())
}
