//! Durable artifact files.
//!
//! One pretty-printed JSON document per artifact, named
//! `{type}-{competition_id}.json` inside the data directory. Writes go to a
//! sibling temp file first and are renamed into place, so readers never see
//! a half-written document.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::Error;
use crate::model::ArtifactKind;

/// Flat-file storage for competition artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactFiles {
    dir: PathBuf,
}

impl ArtifactFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the durable file for an artifact.
    pub fn path(&self, kind: ArtifactKind, competition_id: &str) -> PathBuf {
        self.dir.join(kind.file_name(competition_id))
    }

    /// Overwrite the artifact file with `payload`.
    pub async fn write<T: Serialize + ?Sized>(
        &self, kind: ArtifactKind, competition_id: &str, payload: &T,
    ) -> Result<PathBuf, Error> {
        let path = self.path(kind, competition_id);
        let json = serde_json::to_vec_pretty(payload)
            .map_err(|e| Error::StoreDecode(format!("failed to encode {}: {e}", path.display())))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::StoreIo(format!("failed to create {}: {e}", self.dir.display())))?;

        let tmp = self.dir.join(format!(".{}.tmp", kind.file_name(competition_id)));
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| Error::StoreIo(format!("failed to write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Error::StoreIo(format!("failed to replace {}: {e}", path.display())))?;

        tracing::debug!("wrote {} ({} bytes)", path.display(), json.len());

        Ok(path)
    }

    /// Read and decode the artifact file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub async fn read<T: DeserializeOwned>(
        &self, kind: ArtifactKind, competition_id: &str,
    ) -> Result<Option<T>, Error> {
        let path = self.path(kind, competition_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::StoreIo(format!("failed to read {}: {e}", path.display()))),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| Error::StoreDecode(format!("failed to decode {}: {e}", path.display())))
    }
}
