//! One `.npy` file per speaker, replaced atomically on every write.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};
use crate::model::{validate_name, validate_vector};

use super::{npy, VectorStore};

const EXTENSION: &str = "npy";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// One `<name>.npy` file per speaker under a single directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (or create) the embeddings directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| Error::storage(&dir, e))?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{EXTENSION}"))
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".{name}.{}.{seq}.tmp", std::process::id()))
    }

    fn read_record(path: &Path) -> Result<Vec<f32>> {
        let bytes = fs::read(path).map_err(|e| Error::storage(path, e))?;
        let vector = npy::decode(&bytes).map_err(|e| Error::CorruptRecord {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        validate_vector(&vector).map_err(|e| Error::CorruptRecord {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(vector)
    }

    /// Write to a temp file, fsync it, then rename over the target.
    fn write_atomic(&self, target: &Path, tmp: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = File::create(tmp).map_err(|e| Error::storage(tmp, e))?;
        file.write_all(bytes).map_err(|e| Error::storage(tmp, e))?;
        file.sync_all().map_err(|e| Error::storage(tmp, e))?;
        drop(file);

        fs::rename(tmp, target).map_err(|e| Error::storage(target, e))?;
        self.sync_dir()
    }

    #[cfg(unix)]
    fn sync_dir(&self) -> Result<()> {
        File::open(&self.dir)
            .and_then(|d| d.sync_all())
            .map_err(|e| Error::storage(&self.dir, e))
    }

    #[cfg(not(unix))]
    fn sync_dir(&self) -> Result<()> {
        Ok(())
    }

    /// Speaker name for a directory entry, if it looks like a record.
    fn record_name(path: &Path) -> Option<String> {
        if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        match validate_name(stem) {
            Ok(name) if name == stem => Some(name.to_string()),
            _ => {
                log::warn!("Ignoring file with unusable name: {}", path.display());
                None
            }
        }
    }
}

impl VectorStore for FileStore {
    fn put(&self, name: &str, vector: &[f32]) -> Result<()> {
        let name = validate_name(name)?;
        validate_vector(vector)?;

        let target = self.record_path(name);
        let tmp = self.temp_path(name);
        let result = self.write_atomic(&target, &tmp, &npy::encode(vector));

        if result.is_err() && tmp.exists() {
            if let Err(e) = fs::remove_file(&tmp) {
                log::warn!("Failed to remove temp file {}: {}", tmp.display(), e);
            }
        }
        if result.is_ok() {
            log::debug!("Stored {} ({} dims) at {}", name, vector.len(), target.display());
        }
        result
    }

    fn get(&self, name: &str) -> Result<Option<Vec<f32>>> {
        let path = self.record_path(validate_name(name)?);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_record(&path).map(Some)
    }

    fn load_all(&self) -> Result<Vec<(String, Vec<f32>)>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| Error::storage(&self.dir, e))?;

        let mut candidates: Vec<(String, PathBuf)> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| Self::record_name(&path).map(|name| (name, path)))
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let mut records = Vec::with_capacity(candidates.len());
        for (name, path) in candidates {
            match Self::read_record(&path) {
                Ok(vector) => records.push((name, vector)),
                Err(e) => log::warn!("Skipping record {}: {}", path.display(), e),
            }
        }

        log::info!(
            "Loaded {} embeddings from {}",
            records.len(),
            self.dir.display()
        );
        Ok(records)
    }
}
