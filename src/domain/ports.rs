use crate::domain::model::{Extraction, InventoryPayload, RepositoryLocation, ReportOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn repository_url(&self) -> &str;
    fn destination(&self) -> &str;
    fn manifest_path(&self) -> &str;
    fn api_endpoint(&self) -> &str;
    fn api_token(&self) -> Option<&str>;
}

/// Produces a working copy of a remote repository on local disk.
pub trait RepositoryMaterializer: Send + Sync {
    fn materialize(&self, url: &str, destination: &Path) -> Result<RepositoryLocation>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Extraction>;
    async fn transform(&self, extraction: &Extraction) -> Result<InventoryPayload>;
    async fn load(&self, payload: InventoryPayload) -> Result<ReportOutcome>;
}
