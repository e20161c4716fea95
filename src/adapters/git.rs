use crate::domain::model::RepositoryLocation;
use crate::domain::ports::RepositoryMaterializer;
use crate::utils::error::Result;
use git2::{FetchOptions, Progress, RemoteCallbacks};
use std::path::Path;

/// Clones with libgit2 unless the destination already holds a `.git` directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitMaterializer;

impl GitMaterializer {
    pub fn new() -> Self {
        Self
    }

    fn create_callbacks<'a>() -> RemoteCallbacks<'a> {
        let mut callbacks = RemoteCallbacks::new();
        callbacks.transfer_progress(|progress: Progress<'_>| {
            if progress.received_objects() == progress.total_objects() {
                tracing::debug!(
                    objects = progress.total_objects(),
                    bytes = progress.received_bytes(),
                    "Objects received, resolving deltas"
                );
            }
            true
        });
        callbacks
    }
}

pub fn is_repository_cloned(destination: &Path) -> bool {
    destination.join(".git").exists()
}

impl RepositoryMaterializer for GitMaterializer {
    fn materialize(&self, url: &str, destination: &Path) -> Result<RepositoryLocation> {
        std::fs::create_dir_all(destination)?;

        if is_repository_cloned(destination) {
            tracing::info!(path = %destination.display(), "Repository already cloned");
            return Ok(RepositoryLocation {
                path: destination.to_path_buf(),
                url: url.to_string(),
                freshly_cloned: false,
            });
        }

        tracing::info!(url = %url, path = %destination.display(), "Cloning repository");

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(Self::create_callbacks());

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch_options);
        builder.clone(url, destination)?;

        tracing::info!(path = %destination.display(), "✅ Repository cloned successfully");

        Ok(RepositoryLocation {
            path: destination.to_path_buf(),
            url: url.to_string(),
            freshly_cloned: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::InventoryError;
    use tempfile::TempDir;

    #[test]
    fn test_existing_git_dir_skips_clone() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("checkout");
        std::fs::create_dir_all(destination.join(".git")).unwrap();

        // 不存在的遠端：若真的嘗試 clone 會失敗
        let location = GitMaterializer::new()
            .materialize("/definitely/not/a/repository", &destination)
            .unwrap();

        assert!(!location.freshly_cloned);
        assert_eq!(location.path, destination);
    }

    #[test]
    fn test_clone_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("nested").join("checkout");

        let result =
            GitMaterializer::new().materialize("/definitely/not/a/repository", &destination);

        assert!(matches!(result, Err(InventoryError::GitError(_))));
    }
}
