use crate::adapters::http::InventoryClient;
use crate::core::manifest::parse_manifest_bytes;
use crate::domain::model::{
    Extraction, InventoryPayload, ManifestOutcome, ParseReport, RepositoryLocation, ReportOutcome,
};
use crate::domain::ports::{ConfigProvider, Pipeline, RepositoryMaterializer, Storage};
use crate::utils::error::{InventoryError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Clone → read manifest → build payload → POST.
pub struct InventoryPipeline<M, S, C>
where
    M: RepositoryMaterializer + 'static,
    S: Storage,
    C: ConfigProvider,
{
    materializer: Arc<M>,
    storage: S,
    config: C,
    client: InventoryClient,
}

impl<M, S, C> InventoryPipeline<M, S, C>
where
    M: RepositoryMaterializer + 'static,
    S: Storage,
    C: ConfigProvider,
{
    pub fn new(materializer: M, storage: S, config: C) -> Self {
        let client = InventoryClient::new(
            config.api_endpoint(),
            config.api_token().map(str::to_string),
        );
        Self {
            materializer: Arc::new(materializer),
            storage,
            config,
            client,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Runs the blocking clone on tokio's blocking pool.
    pub async fn materialize(&self) -> Result<RepositoryLocation> {
        let materializer = Arc::clone(&self.materializer);
        let url = self.config.repository_url().to_string();
        let destination = PathBuf::from(self.config.destination());

        tokio::task::spawn_blocking(move || materializer.materialize(&url, &destination))
            .await
            .map_err(|e| InventoryError::ProcessingError {
                message: format!("clone task did not complete: {}", e),
            })?
    }

    pub async fn extract_manifest(&self) -> ManifestOutcome {
        let manifest_path = self.config.manifest_path();
        let full_path = Path::new(self.config.destination()).join(manifest_path);

        if !self.storage.exists(manifest_path).await {
            tracing::warn!("⚠️  {} file not found", full_path.display());
            return ManifestOutcome::Missing { path: full_path };
        }

        tracing::info!("📄 {} file was found", full_path.display());
        match self.storage.read_file(manifest_path).await {
            Ok(bytes) => ManifestOutcome::Parsed(parse_manifest_bytes(&bytes)),
            Err(error) => {
                tracing::error!("❌ Error occurred while reading manifest: {}", error);
                ManifestOutcome::Parsed(ParseReport {
                    error: Some(error),
                    ..Default::default()
                })
            }
        }
    }

    /// `Ok(None)` when the manifest is absent; `Err` only when the clone fails.
    pub async fn clone_and_parse(&self) -> Result<Option<ParseReport>> {
        self.materialize().await?;
        match self.extract_manifest().await {
            ManifestOutcome::Missing { .. } => Ok(None),
            ManifestOutcome::Parsed(report) => Ok(Some(report)),
        }
    }
}

#[async_trait::async_trait]
impl<M, S, C> Pipeline for InventoryPipeline<M, S, C>
where
    M: RepositoryMaterializer + 'static,
    S: Storage,
    C: ConfigProvider,
{
    async fn extract(&self) -> Result<Extraction> {
        tracing::info!(
            "🚀 Materializing {} into {}",
            self.config.repository_url(),
            self.config.destination()
        );
        let location = self.materialize().await?;
        let manifest = self.extract_manifest().await;

        Ok(Extraction { location, manifest })
    }

    async fn transform(&self, extraction: &Extraction) -> Result<InventoryPayload> {
        let payload = match &extraction.manifest {
            ManifestOutcome::Parsed(report) => InventoryPayload::from_records(&report.records),
            ManifestOutcome::Missing { .. } => InventoryPayload::default(),
        };
        tracing::debug!("Built payload with {} entries", payload.len());
        Ok(payload)
    }

    async fn load(&self, payload: InventoryPayload) -> Result<ReportOutcome> {
        tracing::info!(
            "📡 Submitting {} packages to {}",
            payload.len(),
            self.client.endpoint()
        );
        self.client.submit(&payload).await
    }
}
