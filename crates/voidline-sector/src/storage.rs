//! Where sector diffs live between visits.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use voidline_core::ids::SectorId;

use crate::diff::SectorDiff;
use crate::error::PersistError;

/// Key/value store of diffs, keyed by sector id.
pub trait DiffStorage {
    /// `Ok(None)` when the sector has never been saved.
    fn read_diff(&self, sector: &SectorId) -> Result<Option<SectorDiff>, PersistError>;
    fn write_diff(&mut self, diff: &SectorDiff) -> Result<(), PersistError>;
}

/// In-process storage. Diffs are kept as encoded JSON so every write goes
/// through the same serialization path as the on-disk store.
#[derive(Debug, Default)]
pub struct MemoryDiffStorage {
    diffs: HashMap<SectorId, String>,
}

impl MemoryDiffStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Raw JSON stored for `sector`.
    pub fn raw(&self, sector: &SectorId) -> Option<&str> {
        self.diffs.get(sector).map(String::as_str)
    }

    /// Store raw JSON for `sector`, bypassing encoding.
    pub fn insert_raw(&mut self, sector: SectorId, json: impl Into<String>) {
        self.diffs.insert(sector, json.into());
    }
}

impl DiffStorage for MemoryDiffStorage {
    fn read_diff(&self, sector: &SectorId) -> Result<Option<SectorDiff>, PersistError> {
        self.diffs
            .get(sector)
            .map(|json| serde_json::from_str(json).map_err(PersistError::from))
            .transpose()
    }

    fn write_diff(&mut self, diff: &SectorDiff) -> Result<(), PersistError> {
        let json = serde_json::to_string(diff)?;
        self.diffs.insert(diff.sector_id.clone(), json);
        Ok(())
    }
}

/// One pretty-printed `<sector_id>.json` file per sector.
#[derive(Debug, Clone)]
pub struct JsonDirDiffStorage {
    dir: PathBuf,
}

impl JsonDirDiffStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn diff_path(&self, sector: &SectorId) -> PathBuf {
        self.dir.join(format!("{}.json", sector))
    }

    /// Ids of every stored sector, sorted.
    pub fn list(&self) -> Vec<SectorId> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(_) => return Vec::new(),
        };

        let mut ids: Vec<SectorId> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(SectorId::new)
            })
            .collect();
        ids.sort();
        ids
    }

    /// Forget a sector. Deleting a sector that was never saved is fine.
    pub fn delete(&self, sector: &SectorId) -> Result<(), PersistError> {
        let path = self.diff_path(sector);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

impl DiffStorage for JsonDirDiffStorage {
    fn read_diff(&self, sector: &SectorId) -> Result<Option<SectorDiff>, PersistError> {
        let path = self.diff_path(sector);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn write_diff(&mut self, diff: &SectorDiff) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.diff_path(&diff.sector_id);
        let json = serde_json::to_string_pretty(diff)?;
        fs::write(&path, json)?;
        tracing::debug!(sector = %diff.sector_id, path = %path.display(), "wrote sector diff");
        Ok(())
    }
}
