use crate::errors::RosterError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// The active log plus this many rotated generations share the byte budget.
pub const MAX_LOG_GENERATIONS: u64 = 4;

/// The files one log owns: the active `roster.jsonl` and its rotated
/// `roster.<n>.jsonl` generations. Other files in the directory are never
/// counted or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFamily {
    dir: PathBuf,
    active: PathBuf,
    stem: String,
    extension: Option<String>,
}

impl LogFamily {
    pub fn for_path(path: &Path) -> Result<Self, RosterError> {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                RosterError::Io(format!("log path {} has no usable file name", path.display()))
            })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string);
        // A bare file name has an empty parent; that is the current directory.
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        Ok(Self {
            dir,
            active: path.to_path_buf(),
            stem: stem.to_string(),
            extension,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn active(&self) -> &Path {
        &self.active
    }

    pub fn generation_path(&self, generation: u64) -> PathBuf {
        let name = match &self.extension {
            Some(ext) => format!("{}.{generation}.{ext}", self.stem),
            None => format!("{}.{generation}", self.stem),
        };
        self.dir.join(name)
    }

    /// Generation number encoded in a rotated file name, `None` for anything else.
    pub fn generation_of(&self, file_name: &str) -> Option<u64> {
        let rest = file_name.strip_prefix(&self.stem)?.strip_prefix('.')?;
        let number = match &self.extension {
            Some(ext) => rest.strip_suffix(ext.as_str())?.strip_suffix('.')?,
            None => rest,
        };
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        number.parse().ok()
    }

    /// Rotated generations, oldest first.
    pub fn rotated(&self) -> Result<Vec<(u64, PathBuf)>, RosterError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RosterError::Io(e.to_string())),
        };
        let mut generations = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let generation = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| self.generation_of(name))?;
                Some((generation, path))
            })
            .collect::<Vec<_>>();
        generations.sort_by_key(|(generation, _)| *generation);
        Ok(generations)
    }
}

/// Moves the active log to the next generation when `incoming_bytes` would
/// push it past `generation_bytes`. An empty active log is never rotated, so a
/// single oversized line still lands in the active file.
pub fn rotate_if_needed(
    family: &LogFamily,
    incoming_bytes: u64,
    generation_bytes: u64,
) -> Result<Option<PathBuf>, RosterError> {
    let current = file_len(family.active())?;
    if current == 0 || current.saturating_add(incoming_bytes) <= generation_bytes {
        return Ok(None);
    }
    let next = family
        .rotated()?
        .last()
        .map(|(generation, _)| generation + 1)
        .unwrap_or(1);
    let target = family.generation_path(next);
    fs::rename(family.active(), &target).map_err(|e| RosterError::Io(e.to_string()))?;
    Ok(Some(target))
}

/// Deletes rotated generations, oldest first, until the family fits
/// `budget_bytes`. The active log is always kept.
pub fn enforce_total_budget(
    family: &LogFamily,
    budget_bytes: u64,
) -> Result<Vec<PathBuf>, RosterError> {
    let rotated = family.rotated()?;
    let mut total = file_len(family.active())?;
    let mut sized = Vec::with_capacity(rotated.len());
    for (_, path) in rotated {
        let len = file_len(&path)?;
        total = total.saturating_add(len);
        sized.push((path, len));
    }

    let mut deleted = Vec::new();
    for (path, len) in sized {
        if total <= budget_bytes {
            break;
        }
        fs::remove_file(&path).map_err(|e| RosterError::Io(e.to_string()))?;
        total = total.saturating_sub(len);
        deleted.push(path);
    }

    Ok(deleted)
}

fn file_len(path: &Path) -> Result<u64, RosterError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
        Err(e) => Err(RosterError::Io(e.to_string())),
    }
}
