use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::{DarkMode, TailwindConfig};
use crate::content::PatternMatches;

/// Files shown per pattern in the report
const SAMPLE_SIZE: usize = 5;

/// Resolution result for a single content pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternReport {
    pub pattern: String,

    /// Number of files matched after exclusions
    pub matched_files: usize,

    /// First few matched files, relative to the manifest directory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample: Vec<PathBuf>,
}

/// Result of checking a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// Version of the report format
    pub version: String,

    /// Timestamp when the check ran
    pub checked_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<PathBuf>,

    pub dark_mode: DarkMode,

    pub content_patterns: usize,

    pub plugin_count: usize,

    /// Whether the manifest declares any content pattern
    pub complete: bool,

    pub patterns: Vec<PatternReport>,

    /// Distinct files matched across all patterns
    pub total_files: usize,

    pub warnings: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<String>,
}

impl CheckReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Convert report to pretty JSON string
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Builder pattern for creating check reports
pub struct ReportBuilder {
    report: CheckReport,
    start_time: Option<Instant>,
}

impl ReportBuilder {
    pub fn new(config: &TailwindConfig) -> Self {
        Self {
            report: CheckReport {
                version: "1.0.0".to_string(),
                checked_at: Utc::now(),
                manifest_path: None,
                dark_mode: config.dark_mode(),
                content_patterns: config.content().len(),
                plugin_count: config.plugins().len(),
                complete: config.is_complete(),
                patterns: Vec::new(),
                total_files: 0,
                warnings: Vec::new(),
                processing_time_ms: None,
                tool_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
            start_time: Some(Instant::now()),
        }
    }

    pub fn with_manifest_path(mut self, path: PathBuf) -> Self {
        self.report.manifest_path = Some(path);
        self
    }

    /// Record resolved content patterns
    pub fn with_matches(mut self, matches: &[PatternMatches]) -> Self {
        let mut distinct = HashSet::new();
        for matched in matches {
            distinct.extend(matched.files.iter());
            self.report.patterns.push(PatternReport {
                pattern: matched.pattern.clone(),
                matched_files: matched.files.len(),
                sample: matched.files.iter().take(SAMPLE_SIZE).cloned().collect(),
            });
        }
        self.report.total_files = distinct.len();
        self
    }

    /// Compute warnings and timing and return the report
    pub fn build(mut self) -> CheckReport {
        if !self.report.complete {
            self.report
                .warnings
                .push("content is empty; no source files will be scanned".to_string());
        }

        for pattern in &self.report.patterns {
            if pattern.matched_files == 0 {
                self.report
                    .warnings
                    .push(format!("content pattern '{}' matches no files", pattern.pattern));
            }
        }

        self.report.processing_time_ms = self.start_time.map(|t| t.elapsed().as_millis() as u64);
        self.report
    }
}
