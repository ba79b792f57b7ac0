use std::path::PathBuf;

use async_trait::async_trait;

/// # Permanent artifact store
///
/// Finalized uploads land here, addressed by content hash. Identical bytes
/// share one stored artifact regardless of how many uploads produced them;
/// the user-supplied file name never appears in a path.
#[async_trait]
pub trait ArtifactStoreService: Send + Sync {
    async fn store(&self, hash: &str, content: &[u8]) -> anyhow::Result<PathBuf>;

    async fn exists(&self, hash: &str) -> anyhow::Result<bool>;

    async fn read(&self, hash: &str) -> anyhow::Result<Vec<u8>>;

    fn path_of(&self, hash: &str) -> PathBuf;
}
