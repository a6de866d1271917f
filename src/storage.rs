//! File storage for uploaded license documents.

use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Extensions accepted for license scans.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "png", "jpg", "jpeg"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("files of type `{0}` are not accepted")]
    UnsupportedType(String),
    #[error("the uploaded file is empty")]
    Empty,
    #[error("document path `{0}` is outside the upload directory")]
    InvalidPath(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Stores documents below a root directory, partitioned by hub.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy `content` to `licenses/{hub}/{license}.{ext}` and return that relative path.
    pub fn save_license_document<R: Read + Seek>(
        &self,
        hub_id: i32,
        license_id: i32,
        file_name: Option<&str>,
        content: &mut R,
    ) -> Result<String, StorageError> {
        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(StorageError::UnsupportedType(extension));
        }

        let relative = format!("licenses/{hub_id}/{license_id}.{extension}");
        let target = self.root.join(&relative);
        // Staged next to the target so a rejected upload leaves the stored copy intact.
        let directory = target.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(directory)?;
        let mut staged = NamedTempFile::new_in(directory)?;

        content.rewind()?;
        let written = io::copy(content, &mut staged)?;
        if written == 0 {
            return Err(StorageError::Empty);
        }
        staged.persist(&target).map_err(|err| err.error)?;

        log::info!("Stored license document {}", target.display());
        Ok(relative)
    }

    /// Absolute path of a stored document; rejects paths escaping the root.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, StorageError> {
        let path = Path::new(relative);
        let escapes = path.is_absolute()
            || path
                .components()
                .any(|component| !matches!(component, std::path::Component::Normal(_)));
        if escapes {
            return Err(StorageError::InvalidPath(relative.to_string()));
        }
        Ok(self.root.join(path))
    }

    /// Remove a stored document; missing files are ignored.
    pub fn remove(&self, relative: &str) -> Result<(), StorageError> {
        let path = self.resolve(relative)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn saves_document_under_hub_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = DocumentStore::new(dir.path());

        let relative = store
            .save_license_document(3, 11, Some("Permit.PDF"), &mut Cursor::new(b"%PDF-1.4"))
            .expect("stored");

        assert_eq!(relative, "licenses/3/11.pdf");
        let stored = fs::read(dir.path().join(&relative)).expect("file exists");
        assert_eq!(stored, b"%PDF-1.4");
    }

    #[test]
    fn rejects_unsupported_and_empty_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = DocumentStore::new(dir.path());

        assert!(matches!(
            store.save_license_document(1, 1, Some("run.exe"), &mut Cursor::new(b"MZ")),
            Err(StorageError::UnsupportedType(ext)) if ext == "exe"
        ));
        assert!(matches!(
            store.save_license_document(1, 1, Some("scan.png"), &mut Cursor::new(Vec::new())),
            Err(StorageError::Empty)
        ));
        assert!(!dir.path().join("licenses/1/1.png").exists());
    }

    #[test]
    fn resolve_rejects_traversal() {
        let store = DocumentStore::new("/srv/uploads");

        assert!(store.resolve("licenses/1/2.pdf").is_ok());
        assert!(matches!(
            store.resolve("../etc/passwd"),
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            store.resolve("/etc/passwd"),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn empty_reupload_keeps_stored_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = DocumentStore::new(dir.path());
        let relative = store
            .save_license_document(7, 5, Some("permit.pdf"), &mut Cursor::new(b"%PDF-1.7"))
            .expect("stored");

        let result =
            store.save_license_document(7, 5, Some("permit.pdf"), &mut Cursor::new(Vec::new()));

        assert!(matches!(result, Err(StorageError::Empty)));
        let stored = fs::read(dir.path().join(&relative)).expect("previous document kept");
        assert_eq!(stored, b"%PDF-1.7");
        let leftovers = fs::read_dir(dir.path().join("licenses/7"))
            .expect("hub directory")
            .count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn reupload_replaces_content() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = DocumentStore::new(dir.path());
        store
            .save_license_document(7, 5, Some("permit.pdf"), &mut Cursor::new(b"old"))
            .expect("stored");

        let relative = store
            .save_license_document(7, 5, Some("renewed.pdf"), &mut Cursor::new(b"new"))
            .expect("replaced");

        assert_eq!(fs::read(dir.path().join(relative)).expect("file"), b"new");
    }
}
