//! Project root detection and log file resolution.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Files that mark a project root when walking up the directory tree.
const ROOT_MARKERS: &[&str] = &[".env", ".git"];

/// Walk up from `start` looking for a project marker.
///
/// Falls back to `start` when no marker is found anywhere above it.
pub fn detect_project_root(start: &Path) -> PathBuf {
    let mut current = start;
    loop {
        if ROOT_MARKERS
            .iter()
            .any(|marker| current.join(marker).exists())
        {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return start.to_path_buf(),
        }
    }
}

/// Resolve the log file to inspect for a project.
///
/// Tries `logs/app.log`, then today's daily file `logs/app-YYYY-MM-DD.log`,
/// then the most recently modified `*.log` under `logs/`. The primary path
/// is returned even when nothing exists, so callers get a stable path to
/// report in "not found" errors.
pub fn resolve_log_file(project_root: &Path) -> PathBuf {
    let log_dir = project_root.join("logs");

    let primary = log_dir.join("app.log");
    if primary.exists() {
        return primary;
    }

    let daily = log_dir.join(format!(
        "app-{}.log",
        chrono::Local::now().format("%Y-%m-%d")
    ));
    if daily.exists() {
        return daily;
    }

    if let Some(newest) = newest_log_file(&log_dir) {
        return newest;
    }

    primary
}

/// Most recently modified `*.log` file in a directory, if any.
fn newest_log_file(log_dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(log_dir).ok()?;
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("log") {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|meta| meta.modified()) else {
            continue;
        };
        if newest.as_ref().is_none_or(|(time, _)| modified > *time) {
            newest = Some((modified, path));
        }
    }

    newest.map(|(_, path)| path)
}
