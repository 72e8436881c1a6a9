use anyhow::{anyhow, Context, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where the bytes of one log file live.
#[derive(Debug, Clone)]
pub enum LogSource {
    Plain(PathBuf),
    Archive { archive: PathBuf, member: String },
}

/// Find `path` on disk, or inside `<path>.7z`, or inside the archive of its folder.
pub fn resolve_log(path: &Path) -> Result<LogSource> {
    if path.is_file() {
        return Ok(LogSource::Plain(path.to_path_buf()));
    }

    let file_name = path
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| anyhow!("invalid log path {}", path.display()))?;

    let own_archive = path.with_file_name(format!("{}.7z", file_name));
    if own_archive.is_file() {
        return Ok(LogSource::Archive {
            archive: own_archive,
            member: file_name.to_string(),
        });
    }

    if let Some(folder) = path.parent() {
        if let Some(folder_name) = folder.file_name().and_then(OsStr::to_str) {
            let folder_archive = folder.with_file_name(format!("{}.7z", folder_name));
            if folder_archive.is_file() {
                return Ok(LogSource::Archive {
                    archive: folder_archive,
                    member: file_name.to_string(),
                });
            }
        }
    }

    Err(anyhow!(
        "log not found: {} (no .7z archive holds it either)",
        path.display()
    ))
}

/// Contents of the entry of `archive` whose name ends with `member`.
///
/// When several entries match, the shortest name wins.
pub fn read_archived(archive: &Path, member: &str) -> Result<Vec<u8>> {
    let mut seven = sevenz_rust::SevenZReader::open(archive, sevenz_rust::Password::empty())
        .with_context(|| format!("failed to open archive {}", archive.display()))?;

    let mut best: Option<(String, Vec<u8>)> = None;
    seven
        .for_each_entries(|entry, reader| {
            let name = entry.name();
            let shorter = best
                .as_ref()
                .map_or(true, |(kept, _)| (name.len(), name) < (kept.len(), kept.as_str()));
            if name.ends_with(member) && shorter {
                let mut content = Vec::new();
                reader.read_to_end(&mut content)?;
                best = Some((name.to_string(), content));
            }
            Ok(true)
        })
        .with_context(|| format!("failed to read {} from {}", member, archive.display()))?;

    best.map(|(_, content)| content)
        .ok_or_else(|| anyhow!("no {} found in archive {}", member, archive.display()))
}

/// `time_<authdb>_<keys>.log` -> `(authdb, keys)`; memory-variant runs are skipped.
fn parse_time_log_name(name: &str) -> Option<(String, String)> {
    let stem = name.strip_prefix("time_")?.strip_suffix(".log")?;
    if stem.ends_with("_lowmem") || stem.contains("_highmem") {
        return None;
    }
    let (authdb, keys) = stem.split_once('_')?;
    Some((authdb.to_string(), keys.to_string()))
}

/// All default-memory `(authdb, keys)` runs with a timing log under `dir`.
pub fn scan_runs(dir: &Path) -> Result<Vec<(String, String)>> {
    let mut runs = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1).follow_links(false) {
        let entry = entry.with_context(|| format!("scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(run) = entry.file_name().to_str().and_then(parse_time_log_name) {
            runs.push(run);
        }
    }
    runs.sort();
    Ok(runs)
}
