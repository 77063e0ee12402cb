use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use ignore::WalkBuilder;

use crate::config::WatchConfig;
use crate::events::EntryId;
use crate::filter::EntryFilter;

/// Flat view of the watched trees at one point in time: entry identity to
/// last-modified time in float seconds since the Unix epoch. Replaced
/// wholesale on every poll tick, never merged.
pub type Snapshot = HashMap<EntryId, f64>;

/// Walk every configured base directory and capture a snapshot.
///
/// Entries that fail a stat call (deleted mid-scan, permission denied) are
/// silently omitted; a scan as a whole never fails. When hidden entries are
/// excluded, hidden directories are pruned before descent, so nothing under
/// them is visited at all.
pub fn scan(config: &WatchConfig, filter: &EntryFilter) -> Snapshot {
    let mut snapshot = Snapshot::new();

    for base in &config.paths {
        let base = base.canonicalize().unwrap_or_else(|_| base.clone());
        scan_base(&base, config, filter, &mut snapshot);
    }

    snapshot
}

fn scan_base(base: &Path, config: &WatchConfig, filter: &EntryFilter, snapshot: &mut Snapshot) {
    let mut builder = WalkBuilder::new(base);
    builder
        .standard_filters(false)
        .hidden(!config.include_hidden)
        .follow_links(false);
    if !config.recursive {
        builder.max_depth(Some(1));
    }

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!("skipping unreadable entry under {}: {}", base.display(), err);
                continue;
            }
        };
        // Depth 0 is the base itself, never an entry in its own snapshot.
        if entry.depth() == 0 {
            continue;
        }

        let rel_path = match entry.path().strip_prefix(base) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        let mut rel = posix_rel(rel_path);
        if is_dir {
            rel.push('/');
        }

        if !filter.matches(&rel) {
            continue;
        }

        if let Some(mtime) = mtime_seconds(entry.path()) {
            snapshot.insert(EntryId::new(base, rel), mtime);
        }
    }
}

/// Relative path rendered with `/` separators regardless of platform.
fn posix_rel(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn mtime_seconds(path: &Path) -> Option<f64> {
    let modified = path.metadata().ok()?.modified().ok()?;
    let since_epoch = modified.duration_since(UNIX_EPOCH).ok()?;
    Some(since_epoch.as_secs_f64())
}

/// Convenience for one-off scans outside a monitoring session.
pub fn scan_paths(
    paths: &[PathBuf],
    recursive: bool,
    include_hidden: bool,
    filter: &EntryFilter,
) -> Snapshot {
    let config = WatchConfig {
        paths: paths.to_vec(),
        recursive,
        include_hidden,
        ..WatchConfig::default()
    };
    scan(&config, filter)
}
