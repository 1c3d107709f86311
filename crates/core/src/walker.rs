use crate::change_log::append_change;
use crate::filter::FileFilter;
use crate::pipeline::{transform, RenameRules, Transformed};
use crate::remover::RangeError;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

pub const DEFAULT_LOG_PATH: &str = "changes.log";

#[derive(Debug, Clone)]
pub struct RenameConfig {
    pub rules: RenameRules,
    /// Required filename suffix; empty matches every file.
    pub extension: String,
    pub overwrite: bool,
    pub recurse_subdirs: bool,
    pub show_output: bool,
    pub log: bool,
    pub log_path: PathBuf,
    pub dry_run: bool,
    pub filter: FileFilter,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            rules: RenameRules::default(),
            extension: String::new(),
            overwrite: false,
            recurse_subdirs: false,
            show_output: false,
            log: false,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            dry_run: false,
            filter: FileFilter::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenameEvent {
    Preview {
        from: String,
        to: String,
    },
    InvalidRange {
        file: String,
        error: RangeError,
    },
    Renamed {
        from: PathBuf,
        to: PathBuf,
    },
    EmptyName {
        path: PathBuf,
    },
    Conflict {
        target: PathBuf,
    },
    Overwrite {
        target: PathBuf,
    },
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },
    DirectoryNotFound {
        path: PathBuf,
    },
    ListFailed {
        path: PathBuf,
        reason: String,
    },
    LogFailed {
        path: PathBuf,
        reason: String,
    },
    NonUtf8Name {
        path: PathBuf,
    },
}

impl RenameEvent {
    /// `Renamed` is bookkeeping; every other event is shown to the user.
    pub fn is_user_message(&self) -> bool {
        !matches!(self, RenameEvent::Renamed { .. })
    }
}

impl fmt::Display for RenameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameEvent::Preview { from, to } => write!(f, "{from} => {to}"),
            RenameEvent::InvalidRange { error, .. } => {
                let range = error.range();
                write!(
                    f,
                    "Error: ({} to {}) is not a valid range for removal!",
                    range.start, range.end
                )
            }
            RenameEvent::Renamed { from, to } => {
                write!(f, "Renamed: {} => {}", from.display(), to.display())
            }
            RenameEvent::EmptyName { path } => {
                write!(f, "Error: {} would be renamed to an empty name!", path.display())
            }
            RenameEvent::Conflict { target } => {
                write!(f, "Error: {} already exists!", target.display())
            }
            RenameEvent::Overwrite { target } => {
                write!(f, "Overwrite: {} already exists!", target.display())
            }
            RenameEvent::RenameFailed { from, to, reason } => write!(
                f,
                "Error: failed to rename {} => {}: {}",
                from.display(),
                to.display(),
                reason
            ),
            RenameEvent::DirectoryNotFound { path } => {
                write!(f, "Directory not found: \"{}\"", path.display())
            }
            RenameEvent::ListFailed { path, reason } => write!(
                f,
                "Error: failed to read directory {}: {}",
                path.display(),
                reason
            ),
            RenameEvent::LogFailed { path, reason } => write!(
                f,
                "Error: failed to write change log {}: {}",
                path.display(),
                reason
            ),
            RenameEvent::NonUtf8Name { path } => {
                write!(f, "Skipped: {} is not valid UTF-8", path.display())
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameReport {
    /// Files that passed the extension filter and the predicate.
    pub renamed: usize,
    /// Files that passed the extension filter.
    pub processed: usize,
    /// Renames that actually happened on disk.
    pub applied: usize,
    pub unchanged: usize,
    pub conflicts: usize,
    pub events: Vec<RenameEvent>,
}

impl RenameReport {
    pub fn counts(&self) -> (usize, usize) {
        (self.renamed, self.processed)
    }

    pub fn merge(&mut self, other: RenameReport) {
        self.renamed += other.renamed;
        self.processed += other.processed;
        self.applied += other.applied;
        self.unchanged += other.unchanged;
        self.conflicts += other.conflicts;
        self.events.extend(other.events);
    }

    pub fn messages(&self) -> impl Iterator<Item = String> + '_ {
        self.events
            .iter()
            .filter(|event| event.is_user_message())
            .map(ToString::to_string)
    }
}

/// Renames matching files in `dir`, descending into subdirectories when enabled.
///
/// Per-file and per-subdirectory problems (invalid ranges, conflicts, failed
/// renames, unreadable subdirectories, change log failures) are recorded as
/// events and never stop the walk. A missing `dir` yields an empty report with
/// a single [`RenameEvent::DirectoryNotFound`]; only failing to list an existing
/// `dir` itself is an error.
pub fn rename_directory(dir: &Path, config: &RenameConfig) -> Result<RenameReport> {
    let mut report = RenameReport::default();

    if !dir.exists() {
        warn!(dir = %dir.display(), "directory not found");
        report.events.push(RenameEvent::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
        return Ok(report);
    }

    let entries = list_entries(dir)?;
    walk_entries(dir, entries, config, &mut report);
    Ok(report)
}

fn list_entries(dir: &Path) -> Result<Vec<DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to read directory: {}", dir.display()))
}

fn walk_entries(
    dir: &Path,
    entries: Vec<DirEntry>,
    config: &RenameConfig,
    report: &mut RenameReport,
) {
    for entry in entries {
        let path = entry.path();
        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %path.display(), "skipping non UTF-8 file name");
            report.events.push(RenameEvent::NonUtf8Name {
                path: path.to_path_buf(),
            });
            continue;
        };

        if path.is_file() {
            if !name.ends_with(&config.extension) {
                continue;
            }
            report.processed += 1;
            if !config.filter.matches(name) {
                continue;
            }
            report.renamed += 1;
            rename_file(dir, path, name, config, report);
        } else if config.recurse_subdirs && entry.file_type().is_dir() {
            rename_subdirectory(path, config, report);
        }
    }

    info!(
        dir = %dir.display(),
        renamed = report.renamed,
        processed = report.processed,
        "directory done"
    );
}

fn rename_subdirectory(dir: &Path, config: &RenameConfig, report: &mut RenameReport) {
    match list_entries(dir) {
        Ok(entries) => {
            let mut nested = RenameReport::default();
            walk_entries(dir, entries, config, &mut nested);
            report.merge(nested);
        }
        Err(err) => {
            let reason = format!("{err:#}");
            warn!(dir = %dir.display(), %reason, "skipping unreadable directory");
            report.events.push(RenameEvent::ListFailed {
                path: dir.to_path_buf(),
                reason,
            });
        }
    }
}

fn rename_file(
    dir: &Path,
    path: &Path,
    name: &str,
    config: &RenameConfig,
    report: &mut RenameReport,
) {
    let Transformed {
        name: new_name,
        rejected_ranges,
    } = transform(name, &config.rules);

    for error in rejected_ranges {
        warn!(file = name, %error, "skipping removal range");
        report.events.push(RenameEvent::InvalidRange {
            file: name.to_string(),
            error,
        });
    }

    if config.dry_run || config.show_output {
        report.events.push(RenameEvent::Preview {
            from: name.to_string(),
            to: new_name.clone(),
        });
    }

    if config.log {
        if let Err(err) = append_change(&config.log_path, name, &new_name) {
            let reason = format!("{err:#}");
            warn!(log = %config.log_path.display(), %reason, "change log write failed");
            report.events.push(RenameEvent::LogFailed {
                path: config.log_path.clone(),
                reason,
            });
        }
    }

    if config.dry_run {
        return;
    }

    if new_name == name {
        report.unchanged += 1;
        return;
    }

    if new_name.is_empty() {
        warn!(file = name, "rules produce an empty name");
        report.events.push(RenameEvent::EmptyName {
            path: path.to_path_buf(),
        });
        return;
    }

    let target = dir.join(&new_name);
    if target.exists() {
        if !config.overwrite {
            warn!(target = %target.display(), "destination exists, skipping");
            report.conflicts += 1;
            report.events.push(RenameEvent::Conflict { target });
            return;
        }

        if let Err(err) = fs::remove_file(&target) {
            warn!(target = %target.display(), %err, "failed to remove destination");
            report.events.push(RenameEvent::RenameFailed {
                from: path.to_path_buf(),
                to: target,
                reason: err.to_string(),
            });
            return;
        }
        report.events.push(RenameEvent::Overwrite {
            target: target.clone(),
        });
    }

    match fs::rename(path, &target) {
        Ok(()) => {
            debug!(from = %path.display(), to = %target.display(), "renamed");
            report.applied += 1;
            report.events.push(RenameEvent::Renamed {
                from: path.to_path_buf(),
                to: target,
            });
        }
        Err(err) => {
            warn!(from = %path.display(), to = %target.display(), %err, "rename failed");
            report.events.push(RenameEvent::RenameFailed {
                from: path.to_path_buf(),
                to: target,
                reason: err.to_string(),
            });
        }
    }
}
