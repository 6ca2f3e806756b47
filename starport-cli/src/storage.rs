use std::fs;
use std::io;
use std::path::PathBuf;

use starport_core::StationStorage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Save blobs stored as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StationStorage for FileStorage {
    type Error = FileStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FileStorageError::Read { path, source }),
        }
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir).map_err(|source| FileStorageError::Write {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, blob).map_err(|source| FileStorageError::Write { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileStorageError::Write { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "starport-storage-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn missing_blob_reads_as_none() {
        let storage = FileStorage::new(temp_dir("missing"));
        assert!(storage.get("starport_save").unwrap().is_none());
        storage.remove("starport_save").unwrap();
    }

    #[test]
    fn blobs_round_trip_through_files() {
        let dir = temp_dir("roundtrip");
        let storage = FileStorage::new(&dir);
        storage.set("starport_save", "{\"schemaVersion\":1}").unwrap();
        assert!(storage.path_for("starport_save").exists());
        assert_eq!(
            storage.get("starport_save").unwrap().as_deref(),
            Some("{\"schemaVersion\":1}")
        );
        storage.remove("starport_save").unwrap();
        assert!(storage.get("starport_save").unwrap().is_none());
        let _ = fs::remove_dir_all(dir);
    }
}
