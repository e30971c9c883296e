use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{ManifestError, Result};

/// Conventional manifest file names, highest precedence first
pub const CONFIG_FILE_NAMES: [&str; 7] = [
    "tailwind.config.js",
    "tailwind.config.cjs",
    "tailwind.config.mjs",
    "tailwind.config.ts",
    "tailwind.config.json",
    "tailwind.config.yaml",
    "tailwind.config.yml",
];

/// First conventional manifest file present directly in `dir`
pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Search `start` and then each of its ancestors for a manifest
pub fn locate(start: &Path) -> Result<PathBuf> {
    let start_dir = start.canonicalize()?;
    if !start_dir.is_dir() {
        return Err(ManifestError::InvalidInput(format!(
            "'{}' is not a directory",
            start.display()
        )));
    }

    for dir in start_dir.ancestors() {
        if let Some(found) = find_in_dir(dir) {
            debug!(path = %found.display(), "found Tailwind configuration");
            return Ok(found);
        }
    }

    Err(ManifestError::NotFound {
        start: start.to_path_buf(),
    })
}
