use indexmap::IndexSet;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::TailwindConfig;
use crate::errors::{ManifestError, Result};

/// Why a content pattern is not a usable glob
#[derive(Debug, Error)]
pub enum PatternSyntaxError {
    #[error("pattern is empty")]
    Empty,

    #[error("unbalanced braces")]
    UnbalancedBraces,

    #[error("leading or trailing whitespace")]
    SurroundingWhitespace,

    #[error("brace groups expand to more than {limit} patterns")]
    TooManyExpansions { limit: usize },

    #[error("{0}")]
    Glob(#[from] glob::PatternError),
}

/// A parsed content pattern.
///
/// A leading `!` marks an exclusion. `{a,b}` groups are expanded into one glob
/// per alternative, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPattern {
    raw: String,
    exclude: bool,
    expansions: Vec<String>,
    compiled: Vec<glob::Pattern>,
}

impl ContentPattern {
    pub fn parse(raw: &str) -> std::result::Result<Self, PatternSyntaxError> {
        let (exclude, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        if body.is_empty() {
            return Err(PatternSyntaxError::Empty);
        }
        if body.trim() != body {
            return Err(PatternSyntaxError::SurroundingWhitespace);
        }

        let expansions = expand_braces(body)?;
        let compiled = expansions
            .iter()
            .map(|expansion| glob::Pattern::new(strip_current_dir(expansion)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            exclude,
            expansions,
            compiled,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_exclusion(&self) -> bool {
        self.exclude
    }

    /// Brace-free globs this pattern stands for
    pub fn expansions(&self) -> &[String] {
        &self.expansions
    }

    /// Match a path relative to the manifest directory
    pub fn matches(&self, relative: &Path) -> bool {
        self.compiled.iter().any(|pattern| pattern.matches_path(relative))
    }
}

fn strip_current_dir(pattern: &str) -> &str {
    pattern.strip_prefix("./").unwrap_or(pattern)
}

/// Upper bound on the globs a single pattern may expand to
pub const MAX_EXPANSIONS: usize = 1024;

/// Expand `{a,b}` groups, nesting allowed; duplicates are dropped keeping first occurrence
pub fn expand_braces(pattern: &str) -> std::result::Result<Vec<String>, PatternSyntaxError> {
    let mut expanded = IndexSet::new();
    let mut produced = 0usize;
    expand_into(pattern, &mut expanded, &mut produced)?;
    Ok(expanded.into_iter().collect())
}

/// `produced` counts every leaf, duplicates included, so repeated groups stay bounded too
fn expand_into(
    pattern: &str,
    expanded: &mut IndexSet<String>,
    produced: &mut usize,
) -> std::result::Result<(), PatternSyntaxError> {
    let Some(open) = pattern.find('{') else {
        if pattern.contains('}') {
            return Err(PatternSyntaxError::UnbalancedBraces);
        }
        *produced += 1;
        if *produced > MAX_EXPANSIONS {
            return Err(PatternSyntaxError::TooManyExpansions { limit: MAX_EXPANSIONS });
        }
        expanded.insert(pattern.to_string());
        return Ok(());
    };

    if pattern[..open].contains('}') {
        return Err(PatternSyntaxError::UnbalancedBraces);
    }

    let mut depth = 0usize;
    let mut close = None;
    let mut bounds = vec![open];
    for (offset, ch) in pattern[open..].char_indices() {
        let idx = open + offset;
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(idx);
                    break;
                }
            }
            ',' if depth == 1 => bounds.push(idx),
            _ => {}
        }
    }
    let close = close.ok_or(PatternSyntaxError::UnbalancedBraces)?;
    bounds.push(close);

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    for window in bounds.windows(2) {
        let alternative = &pattern[window[0] + 1..window[1]];
        expand_into(&format!("{}{}{}", prefix, alternative, suffix), expanded, produced)?;
    }

    Ok(())
}

/// Files matched by one inclusion pattern, relative to the manifest directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatches {
    pub pattern: String,
    pub files: Vec<PathBuf>,
}

/// Resolve the content patterns of `config` against `root`.
///
/// Inclusion patterns are resolved in parallel; results keep the manifest order.
/// Files matched by any exclusion pattern are dropped from every result.
pub fn resolve(config: &TailwindConfig, root: &Path, jobs: Option<usize>) -> Result<Vec<PatternMatches>> {
    let patterns = config
        .content()
        .iter()
        .map(|raw| {
            ContentPattern::parse(raw).map_err(|e| ManifestError::invalid_pattern("content", raw, e))
        })
        .collect::<Result<Vec<_>>>()?;

    let (exclusions, inclusions): (Vec<_>, Vec<_>) =
        patterns.into_iter().partition(ContentPattern::is_exclusion);

    debug!(
        root = %root.display(),
        inclusions = inclusions.len(),
        exclusions = exclusions.len(),
        "resolving content patterns"
    );

    // Configure thread pool only if specified and not already initialized
    if let Some(num_jobs) = jobs {
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(num_jobs)
            .build_global();
    }

    inclusions
        .par_iter()
        .map(|pattern| resolve_pattern(pattern, root, &exclusions))
        .collect()
}

fn resolve_pattern(pattern: &ContentPattern, root: &Path, exclusions: &[ContentPattern]) -> Result<PatternMatches> {
    let base = glob::Pattern::escape(&root.to_string_lossy());
    let mut files = BTreeSet::new();

    for expansion in pattern.expansions() {
        let target = strip_current_dir(expansion);
        let full = if Path::new(target).is_absolute() {
            target.to_string()
        } else {
            format!("{}/{}", base.trim_end_matches('/'), target)
        };

        for entry in glob::glob(&full)? {
            let path = entry?;
            if path.is_dir() {
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            if exclusions.iter().any(|exclusion| exclusion.matches(&relative)) {
                trace!(file = %relative.display(), "excluded");
                continue;
            }
            files.insert(relative);
        }
    }

    debug!(pattern = pattern.raw(), files = files.len(), "pattern resolved");
    Ok(PatternMatches {
        pattern: pattern.raw().to_string(),
        files: files.into_iter().collect(),
    })
}
