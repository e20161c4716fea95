use crate::core::Pipeline;
use crate::domain::model::{Delivery, ManifestOutcome, ManifestStatus, RunReport};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use chrono::Utc;

pub struct InventoryEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> InventoryEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Only a failed clone comes back as `Err`; manifest and delivery problems land in the report.
    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        tracing::info!("Starting inventory run...");
        self.monitor.log_stats("Start");

        // Extract
        let extraction = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        let (manifest, accepted, skipped) = match &extraction.manifest {
            ManifestOutcome::Missing { path } => {
                tracing::info!("No manifest at {}, nothing to report", path.display());
                (ManifestStatus::Missing, 0, 0)
            }
            ManifestOutcome::Parsed(report) => {
                let status = match &report.error {
                    Some(error) => ManifestStatus::Partial {
                        error: error.to_string(),
                    },
                    None => ManifestStatus::Parsed,
                };
                tracing::info!(
                    "Extracted {} dependencies ({} skipped)",
                    report.records.len(),
                    report.skipped.len()
                );
                (status, report.records.len(), report.skipped.len())
            }
        };

        let (submitted, delivery) = if accepted == 0 {
            if manifest != ManifestStatus::Missing {
                tracing::info!("No dependencies to report, skipping API call");
            }
            (0, Delivery::NotAttempted)
        } else {
            // Transform
            let payload = self.pipeline.transform(&extraction).await?;
            self.monitor.log_stats("Transform");
            let submitted = payload.len();

            // Load
            let delivery = match self.pipeline.load(payload).await {
                Ok(outcome) => Delivery::from(outcome),
                Err(e) => {
                    tracing::error!("❌ Error occurred: {}", e);
                    Delivery::Failed(e.to_string())
                }
            };
            self.monitor.log_stats("Load");
            (submitted, delivery)
        };

        self.monitor.log_final_stats();

        Ok(RunReport {
            location: extraction.location,
            manifest,
            submitted,
            skipped,
            delivery,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
