//! Filesystem existence checks

use async_trait::async_trait;
use std::path::Path;

/// Answers whether a path exists. Never fails.
#[async_trait]
pub trait FilesystemProbe: Send + Sync {
    /// Returns `false` on any access error as well as on absence.
    async fn exists(&self, path: &Path) -> bool;
}

/// [`FilesystemProbe`] backed by `tokio::fs`.
#[derive(Debug, Clone, Default)]
pub struct TokioFilesystemProbe;

impl TokioFilesystemProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FilesystemProbe for TokioFilesystemProbe {
    async fn exists(&self, path: &Path) -> bool {
        match tokio::fs::try_exists(path).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "existence check failed");
                false
            }
        }
    }
}
