use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::{Error, Result};

pub const EXTENSION: &str = ".fods";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rewrite files in place.
    Write,
    /// Only report files that are not minimized yet.
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Rewritten,
    WouldRewrite,
}

#[derive(Debug, Default)]
pub struct Summary {
    pub unchanged: usize,
    pub rewritten: usize,
    pub would_rewrite: usize,
    pub failed: Vec<PathBuf>,
}

impl Summary {
    /// No failures, and in check mode nothing left to minimize.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.would_rewrite == 0
    }
}

/// Flat ODF spreadsheets, excluding `_`-prefixed scratch copies.
pub fn is_candidate(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(EXTENSION) && !name.starts_with('_'))
}

/// Result of walking a root directory.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Candidate files, sorted.
    pub files: Vec<PathBuf>,
    /// Entries the walk could not read. They are skipped.
    pub unreadable: Vec<PathBuf>,
}

/// Candidate files below `root`. An unreadable entry is logged and skipped.
pub fn discover(root: &Path) -> Discovery {
    let mut found = Discovery::default();
    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_candidate(entry.path()) => {
                found.files.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                log::error!("Failed to read {}: {e}", path.display());
                found.unreadable.push(path);
            }
        }
    }
    found.files.sort();
    found
}

/// Minimizes a single file.
pub fn process(path: &Path, mode: Mode) -> Result<Outcome> {
    let original = fs::read(path)?;
    let (minimized, stats) = crate::minimize(original.as_slice())?;
    log::debug!(
        "countStart={} countChars={} countEnd={} stackMax={}",
        stats.starts,
        stats.characters,
        stats.ends,
        stats.max_depth
    );
    if minimized.as_bytes() == original.as_slice() {
        return Ok(Outcome::Unchanged);
    }
    match mode {
        Mode::Check => Ok(Outcome::WouldRewrite),
        Mode::Write => {
            replace(path, minimized.as_bytes())?;
            Ok(Outcome::Rewritten)
        }
    }
}

/// Writes through a sibling temporary file so the target is never left half written.
fn replace(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content)?;
    file.as_file().sync_all()?;
    fs::set_permissions(file.path(), permissions)?;
    file.persist(path).map_err(|e| Error::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Processes every candidate below `root`. A failing file or unreadable
/// directory is logged, recorded in [`Summary::failed`] and skipped.
pub fn run(root: &Path, mode: Mode) -> Summary {
    let Discovery { files, unreadable } = discover(root);
    let mut summary = Summary {
        failed: unreadable,
        ..Summary::default()
    };
    for path in files {
        log::info!("{}", path.display());
        match process(&path, mode) {
            Ok(Outcome::Unchanged) => {
                log::info!("Already minimized");
                summary.unchanged += 1;
            }
            Ok(Outcome::Rewritten) => {
                log::info!("Rewritten");
                summary.rewritten += 1;
            }
            Ok(Outcome::WouldRewrite) => {
                log::warn!("{} is not minimized", path.display());
                summary.would_rewrite += 1;
            }
            Err(e) => {
                log::error!("Failed to minimize {}: {e}", path.display());
                summary.failed.push(path);
            }
        }
    }
    log::info!(
        "{} rewritten, {} unchanged, {} pending, {} failed",
        summary.rewritten,
        summary.unchanged,
        summary.would_rewrite,
        summary.failed.len()
    );
    summary
}
