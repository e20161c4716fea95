pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{GitMaterializer, InventoryClient, LocalStorage};
pub use config::toml_config::TomlConfig;
pub use core::{etl::InventoryEngine, pipeline::InventoryPipeline};
pub use domain::model::{
    DependencyRecord, Delivery, InventoryPayload, ManifestOutcome, ManifestStatus, ParseReport,
    RepositoryLocation, ReportOutcome, RunReport,
};
pub use utils::error::{InventoryError, Result};
