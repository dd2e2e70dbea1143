use crate::{KeyValueStore, StorageError, StorageResult};

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};

const DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Key-value store persisted as a single JSON object on disk.
///
/// Writes go through a temp file, fsync and rename so a crash mid-write
/// leaves the previous contents intact. An unreadable file is moved aside
/// and the store starts empty.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

type Entries = BTreeMap<String, String>;

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, ()>> {
        self.guard.lock().map_err(|_| StorageError::poisoned())
    }

    fn load(&self) -> StorageResult<Entries> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| StorageError::io(self.path.clone(), e))?;

        if contents.trim().is_empty() {
            return Ok(Entries::new());
        }

        match serde_json::from_str::<Entries>(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Store file corrupted at {:?}: {e}", self.path);
                self.backup_corrupted()?;
                Ok(Entries::new())
            }
        }
    }

    fn save(&self, entries: &Entries) -> StorageResult<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|e| StorageError::io(dir.to_path_buf(), e))?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        let temp_path = self.temp_path();

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| StorageError::io(temp_path.clone(), e))?;

            file.write_all(json.as_bytes())
                .map_err(|e| StorageError::io(temp_path.clone(), e))?;

            file.sync_all()
                .map_err(|e| StorageError::io(temp_path.clone(), e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StorageError::io(self.path.clone(), e)
        })?;

        debug!("Saved {} entries to {:?}", entries.len(), self.path);
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".tmp.{}", std::process::id()));
        self.path.with_file_name(name)
    }

    /// Renames the file to `<name>.corrupted.{timestamp}`.
    fn backup_corrupted(&self) -> StorageResult<PathBuf> {
        let timestamp = chrono::Utc::now().format(DATE_FORMAT);
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".corrupted.{timestamp}"));
        let backup_path = self.path.with_file_name(name);

        fs::rename(&self.path, &backup_path).map_err(|e| StorageError::io(backup_path.clone(), e))?;

        warn!("Backed up corrupted store to {backup_path:?}");
        Ok(backup_path)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock()?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock()?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.lock()?;
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let _guard = self.lock()?;
        Ok(self.load()?.into_keys().collect())
    }

    fn clear(&self) -> StorageResult<()> {
        let _guard = self.lock()?;
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| StorageError::io(self.path.clone(), e))?;
        }
        Ok(())
    }
}
