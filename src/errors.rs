use std::path::PathBuf;
use thiserror::Error;

use crate::content::PatternSyntaxError;

/// Main error type for the tailwind-manifest crate
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Syntax or structural violation in a configuration source
    #[error("Malformed configuration in {source_name}: {message}")]
    Malformed { source_name: String, message: String },

    #[error("Failed to read config file {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("No Tailwind configuration found in {} or any parent directory", start.display())]
    NotFound { start: PathBuf },

    #[error("Unsupported config file format: {0}. Use .js, .cjs, .mjs, .ts, .json, .yaml or .yml")]
    UnsupportedFormat(String),

    #[error("Failed to write output to {path}: {message}")]
    OutputError { path: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ManifestError {
    pub(crate) fn malformed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_pattern(source_name: &str, raw: &str, err: PatternSyntaxError) -> Self {
        Self::malformed(source_name, format!("invalid content pattern '{}': {}", raw, err))
    }

    /// Whether the error describes a broken manifest rather than an environment failure
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;
