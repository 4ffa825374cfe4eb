//! Content-addressed image storage
//!
//! Uploaded image bytes are written to a flat directory under a configured
//! root, named by the SHA-256 of the bytes themselves, so identical uploads
//! map to identical files. Serving resolves a requested filename against the
//! same root and substitutes the operator-provisioned `default.jpg` when the
//! file is missing; a missing image is never an error.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

use crate::errors::{ImageStoreError, ImageStoreResult};

/// Filename of the fallback image served for any miss.
const DEFAULT_IMAGE: &str = "default.jpg";

#[derive(Clone)]
pub struct ImageStore {
    image_root: PathBuf,
}

impl ImageStore {
    pub fn new(image_root: PathBuf) -> Self {
        Self { image_root }
    }

    pub async fn ensure_storage_dirs(&self) -> Result<(), std::io::Error> {
        if !self.image_root.exists() {
            fs::create_dir_all(&self.image_root).await?;
        }
        Ok(())
    }

    /// Derive the storage filename for an image payload.
    ///
    /// Deterministic: identical bytes always yield the identical filename.
    /// A collision between distinct payloads would need a SHA-256 collision,
    /// which is not specially handled.
    pub fn derive_filename(image_data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(image_data);
        let hash = hasher.finalize();
        format!("{}.jpg", hex::encode(hash))
    }

    /// Write an image payload under its derived filename and return that
    /// filename. Re-saving identical bytes overwrites the identical file.
    pub async fn save(&self, image_data: &[u8]) -> ImageStoreResult<String> {
        self.ensure_storage_dirs()
            .await
            .map_err(|e| ImageStoreError::Io {
                operation: "save",
                source: e,
            })?;

        let filename = Self::derive_filename(image_data);
        let file_path = self.image_root.join(&filename);

        fs::write(&file_path, image_data)
            .await
            .map_err(|e| ImageStoreError::Io {
                operation: "save",
                source: e,
            })?;

        Ok(filename)
    }

    /// Resolve a requested filename to the path that should be streamed back.
    ///
    /// Names that do not end in `.jpg`, or that carry path components, are
    /// rejected before any filesystem access. A name that passes but has no
    /// file behind it resolves to `default.jpg` instead of an error.
    pub async fn resolve_for_serving(&self, requested: &str) -> ImageStoreResult<PathBuf> {
        if !Self::is_plain_jpg_name(requested) {
            return Err(ImageStoreError::InvalidFilename {
                name: requested.to_string(),
            });
        }

        let path = self.image_root.join(requested);
        match fs::metadata(&path).await {
            Ok(_) => Ok(path),
            Err(_) => {
                debug!("Image not found: {}, serving default", path.display());
                Ok(self.image_root.join(DEFAULT_IMAGE))
            }
        }
    }

    /// Read the resolved file for streaming.
    pub async fn read(&self, path: &Path) -> ImageStoreResult<Vec<u8>> {
        fs::read(path).await.map_err(|e| ImageStoreError::Io {
            operation: "read",
            source: e,
        })
    }

    /// A servable name is a bare `*.jpg` filename. Anything with path
    /// separators or parent components could escape the image root.
    fn is_plain_jpg_name(name: &str) -> bool {
        name.ends_with(".jpg")
            && !name.contains('/')
            && !name.contains('\\')
            && !name.contains("..")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_filename_is_deterministic() {
        let a = ImageStore::derive_filename(b"shoe image bytes");
        let b = ImageStore::derive_filename(b"shoe image bytes");
        assert_eq!(a, b);
        assert!(a.ends_with(".jpg"));
        // 64 hex chars + ".jpg"
        assert_eq!(a.len(), 68);
    }

    #[test]
    fn derive_filename_diverges_for_distinct_bytes() {
        let a = ImageStore::derive_filename(b"shoe image bytes");
        let b = ImageStore::derive_filename(b"bag image bytes");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn rejects_names_without_jpg_suffix_before_touching_disk() {
        // A root that does not exist: any filesystem access would error with
        // Io, so an InvalidFilename proves the name was rejected up front.
        let store = ImageStore::new(PathBuf::from("/nonexistent/image/root"));

        let err = store.resolve_for_serving("foo").await.unwrap_err();
        assert!(matches!(err, ImageStoreError::InvalidFilename { .. }));

        let err = store.resolve_for_serving("foo.png").await.unwrap_err();
        assert!(matches!(err, ImageStoreError::InvalidFilename { .. }));
    }

    #[tokio::test]
    async fn rejects_names_with_path_components() {
        let store = ImageStore::new(PathBuf::from("/nonexistent/image/root"));

        for name in ["../escape.jpg", "sub/dir.jpg", "a\\b.jpg", "..jpg"] {
            let err = store.resolve_for_serving(name).await.unwrap_err();
            assert!(
                matches!(err, ImageStoreError::InvalidFilename { .. }),
                "{name} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn missing_file_resolves_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().to_path_buf());

        let path = store.resolve_for_serving("missing.jpg").await.unwrap();
        assert_eq!(path, dir.path().join("default.jpg"));
    }

    #[tokio::test]
    async fn existing_file_resolves_to_itself() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().to_path_buf());

        let filename = store.save(b"real jpeg bytes").await.unwrap();
        let path = store.resolve_for_serving(&filename).await.unwrap();
        assert_eq!(path, dir.path().join(&filename));
        assert_eq!(store.read(&path).await.unwrap(), b"real jpeg bytes");
    }

    #[tokio::test]
    async fn save_is_idempotent_for_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().to_path_buf());

        let first = store.save(b"same payload").await.unwrap();
        let second = store.save(b"same payload").await.unwrap();
        assert_eq!(first, second);

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
