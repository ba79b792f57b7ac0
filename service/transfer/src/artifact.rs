use std::path::PathBuf;

use async_trait::async_trait;
use domain_transfer::service::ArtifactStoreService;
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Content-addressed artifact directory: one file per hash, written via a
/// staging file and renamed into place so a concurrent reader never sees a
/// partial artifact.
#[derive(TypedBuilder, Clone)]
pub struct LocalArtifactStoreServiceImpl {
    #[builder(default = "artifact_dir".into(), setter(into))]
    base: PathBuf,
}

#[async_trait]
impl ArtifactStoreService for LocalArtifactStoreServiceImpl {
    async fn store(&self, hash: &str, content: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.path_of(hash);
        tokio::fs::create_dir_all(&self.base).await?;
        let staging = self.base.join(format!(".{}_{}", hash, Uuid::new_v4()));
        tokio::fs::write(&staging, content).await?;
        tokio::fs::rename(&staging, &path).await?;
        Ok(path)
    }

    async fn exists(&self, hash: &str) -> anyhow::Result<bool> {
        Ok(tokio::fs::try_exists(self.path_of(hash)).await?)
    }

    async fn read(&self, hash: &str) -> anyhow::Result<Vec<u8>> {
        Ok(tokio::fs::read(self.path_of(hash)).await?)
    }

    fn path_of(&self, hash: &str) -> PathBuf {
        self.base.join(hash.to_uppercase())
    }
}
