//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure. Files
//! holding tokens or plaintext secrets are created owner-readable only.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::KeyvaultError;

/// Read JSON from a file, returning an error if file doesn't exist
pub fn read_json_required<T, P>(path: P) -> Result<T, KeyvaultError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Err(KeyvaultError::file_not_found(path.display().to_string()));
    }

    let file = File::open(path)
        .map_err(|e| KeyvaultError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| KeyvaultError::Json(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Read a text file, returning a "not found" error if it doesn't exist
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String, KeyvaultError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(KeyvaultError::file_not_found(path.display().to_string()));
    }

    fs::read_to_string(path)
        .map_err(|e| KeyvaultError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// This ensures that the file is either completely written or not modified at all,
/// preventing corruption on crashes or power failures.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), KeyvaultError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), false, |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| KeyvaultError::Json(format!("Failed to serialize data: {}", e)))
    })
}

/// Like [`write_json_atomic`], but the file is readable by its owner only
pub fn write_private_json_atomic<T, P>(path: P, data: &T) -> Result<(), KeyvaultError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), true, |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| KeyvaultError::Json(format!("Failed to serialize data: {}", e)))
    })
}

/// Atomically write plaintext secrets (e.g. a `.env` file), owner-only
pub fn write_secret_file<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), KeyvaultError> {
    write_atomic(path.as_ref(), true, |writer| {
        writer
            .write_all(contents.as_bytes())
            .map_err(|e| KeyvaultError::Io(format!("Failed to write data: {}", e)))
    })
}

fn write_atomic<F>(path: &Path, private: bool, write: F) -> Result<(), KeyvaultError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), KeyvaultError>,
{
    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            KeyvaultError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = temp_path_for(path);

    let file = create_file(&temp_path, private)
        .map_err(|e| KeyvaultError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    let result = write(&mut writer)
        .and_then(|_| {
            writer
                .flush()
                .map_err(|e| KeyvaultError::Io(format!("Failed to flush data: {}", e)))
        })
        .and_then(|_| {
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| KeyvaultError::Io(format!("Failed to sync data: {}", e)))
        });

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        KeyvaultError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    tracing::debug!(path = %path.display(), private, "wrote file");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
fn create_file(path: &Path, private: bool) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    if private {
        options.mode(0o600);
    }
    let file = options.open(path)?;

    // `mode` only applies on creation; a leftover temp file keeps its own bits
    if private {
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(file)
}

#[cfg(not(unix))]
fn create_file(path: &Path, _private: bool) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn sample() -> TestData {
        TestData {
            name: "test".to_string(),
            value: 42,
        }
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_json_atomic(&path, &sample()).unwrap();
        let loaded: TestData = read_json_required(&path).unwrap();
        assert_eq!(sample(), loaded);
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_json_atomic(&path, &sample()).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("test.json.tmp").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.json");

        write_json_atomic(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_json_required() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let err = read_json_required::<TestData, _>(&path).unwrap_err();
        assert!(err.is_not_found());

        fs::write(&path, "not json at all").unwrap();
        let err = read_json_required::<TestData, _>(&path).unwrap_err();
        assert!(matches!(err, KeyvaultError::Json(_)));
    }

    #[test]
    fn test_secret_file_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");

        write_secret_file(&path, "A=1\nB=2").unwrap();
        write_secret_file(&path, "C=3").unwrap();
        assert_eq!(read_text(&path).unwrap(), "C=3");
        assert!(!temp_dir.path().join(".env.tmp").exists());
    }

    #[test]
    fn test_read_text_missing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_text(temp_dir.path().join(".env")).unwrap_err().is_not_found());
    }

    #[cfg(unix)]
    #[test]
    fn test_secret_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        fs::write(&path, "OLD=1").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_secret_file(&path, "NEW=1").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_temp_file_does_not_loosen_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        let stale = temp_dir.path().join(".env.tmp");
        fs::write(&stale, "leftover").unwrap();
        fs::set_permissions(&stale, fs::Permissions::from_mode(0o644)).unwrap();

        write_secret_file(&path, "NEW=1").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(read_text(&path).unwrap(), "NEW=1");
    }
}
