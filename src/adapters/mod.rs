// Adapters layer: concrete implementations for external systems (git, http, filesystem).

pub mod git;
pub mod http;
pub mod storage;

pub use git::GitMaterializer;
pub use http::InventoryClient;
pub use storage::LocalStorage;
