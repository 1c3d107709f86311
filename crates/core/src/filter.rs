use anyhow::{Context, Result};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Predicate deciding which file names get renamed.
#[derive(Clone)]
pub struct FileFilter {
    predicate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl FileFilter {
    pub fn new(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    pub fn accept_all() -> Self {
        Self::new(|_| true)
    }

    pub fn contains(needle: impl Into<String>) -> Self {
        let needle = needle.into();
        Self::new(move |name| name.contains(&needle))
    }

    pub fn not_contains(needle: impl Into<String>) -> Self {
        let needle = needle.into();
        Self::new(move |name| !name.contains(&needle))
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern)
            .with_context(|| format!("invalid filename pattern: {pattern}"))?;
        Ok(Self::new(move |name| re.is_match(name)))
    }

    pub fn and(self, other: FileFilter) -> Self {
        Self::new(move |name| self.matches(name) && other.matches(name))
    }

    pub fn matches(&self, name: &str) -> bool {
        (self.predicate)(name)
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl fmt::Debug for FileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FileFilter(..)")
    }
}
