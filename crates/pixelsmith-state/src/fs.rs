//! Filesystem-backed artifact store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::error::StorageResult;
use crate::storage_traits::ArtifactStore;

/// Artifact store writing image files under a single root directory.
///
/// Layout: `<root>/<file_name>` — callers key file names by artifact id,
/// so there is no collision risk and no sharding needed at this scale.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Create a store rooted at `root`. Creates the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Absolute path a file name resolves to.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn write_image(&self, file_name: &str, bytes: &[u8]) -> StorageResult<String> {
        let path = self.path_for(file_name);

        // Atomic write: temp file in the same directory, then rename.
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(bytes)?;
        tmp.persist(&path).map_err(|e| e.error)?;

        Ok(path.display().to_string())
    }
}
