use super::StorageDriver;
use crate::{
    error::SaveResult,
    types::{StorageKey, DEFAULT_SAVE_KEY},
};
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// One file per key. The key is the file path.
#[derive(Debug, Clone)]
pub struct FileDriver {
    key: StorageKey,
}

impl FileDriver {
    /// An empty key falls back to the default save file name.
    pub fn new(key: impl Into<StorageKey>) -> Self {
        let key = key.into();
        if key.is_empty() {
            return Self { key: DEFAULT_SAVE_KEY.to_string() };
        }
        Self { key }
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.key)
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.key.clone();
        tmp.push_str(".tmp");
        PathBuf::from(tmp)
    }
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()?;
    file.sync_all()
}

impl StorageDriver for FileDriver {
    fn save_data(&self, data: &[u8]) -> SaveResult<()> {
        let path = self.path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write to a temp file, then rename over the record: a crash
        // mid-write leaves the previous record intact.
        let temp_path = self.temp_path();
        let written = write_synced(&temp_path, data).and_then(|()| fs::rename(&temp_path, path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        log::debug!("Wrote {} bytes to {}", data.len(), self.key);
        Ok(())
    }

    fn load_data(&self) -> SaveResult<Option<Vec<u8>>> {
        match fs::read(self.path()) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn key_name(&self) -> &str {
        &self.key
    }

    fn sibling(&self, key: &str) -> SaveResult<Box<dyn StorageDriver>> {
        Ok(Box::new(FileDriver::new(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn driver_in(dir: &TempDir, name: &str) -> FileDriver {
        FileDriver::new(dir.path().join(name).to_string_lossy().into_owned())
    }

    #[test]
    fn missing_file_reads_as_no_data() {
        let dir = TempDir::new().unwrap();
        let driver = driver_in(&dir, "absent.json");
        assert_eq!(driver.load_data().unwrap(), None);
    }

    #[test]
    fn write_replaces_previous_bytes() {
        let dir = TempDir::new().unwrap();
        let driver = driver_in(&dir, "nested/save.json");
        driver.save_data(b"first").unwrap();
        driver.save_data(b"second").unwrap();
        assert_eq!(driver.load_data().unwrap().as_deref(), Some(&b"second"[..]));
        assert!(!driver.temp_path().exists());
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory at the record path makes the rename fail.
        let driver = driver_in(&dir, "occupied");
        fs::create_dir_all(driver.path().join("inner")).unwrap();

        assert!(driver.save_data(b"data").is_err());
        assert!(!driver.temp_path().exists());
        assert!(driver.path().is_dir());
    }

    #[test]
    fn empty_key_uses_default_name() {
        assert_eq!(FileDriver::new("").key_name(), DEFAULT_SAVE_KEY);
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a record.
        let driver = FileDriver::new(dir.path().to_string_lossy().into_owned());
        assert!(driver.load_data().is_err());
    }
}
