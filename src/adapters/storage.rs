use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Reads files relative to a working copy on local disk.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.resolve(path)).await?;
        Ok(data)
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::metadata(self.resolve(path))
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
    }
}
