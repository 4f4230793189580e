//! Filesystem-backed image store for uploaded pictures.
//!
//! Files are written under one flat upload directory with millisecond
//! timestamp names, keeping the original extension so browsers infer the
//! content type when the file is served back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{ImageStore, ImageStoreError, StoredImage};

/// Image store writing uploads to a local directory.
pub struct DiskImageStore {
    root: PathBuf,
    public_prefix: String,
}

impl DiskImageStore {
    /// Create a store rooted at `root`, served back under `/uploads`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_prefix: "/uploads".to_owned(),
        }
    }

    /// Directory the store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), ImageStoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| ImageStoreError::io(err.to_string()))
    }

    fn stored_name(original_name: &str) -> String {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        format!("{}{}", Utc::now().timestamp_millis(), extension)
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn store(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, ImageStoreError> {
        let name = Self::stored_name(original_name);
        let path = self.root.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| ImageStoreError::io(err.to_string()))?;
        Ok(StoredImage {
            public_path: format!("{}/{}", self.public_prefix, name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stored_files_keep_their_extension_and_land_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DiskImageStore::new(dir.path());

        let stored = store
            .store("leaf photo.JPG", b"not-really-a-jpeg")
            .await
            .expect("store succeeds");

        assert!(stored.public_path.starts_with("/uploads/"));
        assert!(stored.public_path.ends_with(".JPG"));

        let name = stored
            .public_path
            .rsplit('/')
            .next()
            .expect("file name present");
        let contents = std::fs::read(dir.path().join(name)).expect("file exists");
        assert_eq!(contents, b"not-really-a-jpeg");
    }

    #[tokio::test]
    async fn names_without_extensions_are_bare_timestamps() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DiskImageStore::new(dir.path());

        let stored = store.store("upload", b"bytes").await.expect("store succeeds");
        let name = stored
            .public_path
            .rsplit('/')
            .next()
            .expect("file name present");
        assert!(name.bytes().all(|b| b.is_ascii_digit()));
    }

    #[tokio::test]
    async fn ensure_root_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        let store = DiskImageStore::new(&nested);

        store.ensure_root().await.expect("directories created");
        assert!(nested.is_dir());
    }
}
