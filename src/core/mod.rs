pub mod etl;
pub mod manifest;
pub mod pipeline;

pub use crate::domain::model::{DependencyRecord, InventoryPayload, ParseReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RepositoryMaterializer, Storage};
pub use crate::utils::error::Result;
