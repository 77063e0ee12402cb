use anyhow::{Context, Result};
use glob::Pattern;

/// Glob include/exclude filter applied to posix-style relative paths.
///
/// Include patterns are evaluated first: when any are configured, a candidate
/// must match at least one. Exclude patterns are evaluated second and always
/// win on conflict. Matching uses default glob options, so `*` and `?` cross
/// `/` the way shell fnmatch does.
pub struct EntryFilter {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl EntryFilter {
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self> {
        Ok(Self {
            includes: compile_patterns(includes).context("invalid include pattern")?,
            excludes: compile_patterns(excludes).context("invalid exclude pattern")?,
        })
    }

    /// Passes everything through.
    pub fn empty() -> Self {
        Self {
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }

    pub fn matches(&self, rel: &str) -> bool {
        if !self.includes.is_empty() && !self.includes.iter().any(|p| p.matches(rel)) {
            return false;
        }
        if self.excludes.iter().any(|p| p.matches(rel)) {
            return false;
        }
        true
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("bad glob pattern: {p}")))
        .collect()
}
