use async_trait::async_trait;

use crate::model::{
    entity::Upload,
    vo::{HashAlgorithm, UploadUid},
};

#[async_trait]
pub trait UploadRepo: Send + Sync {
    async fn get_by_uid(&self, uid: &UploadUid) -> anyhow::Result<Option<Upload>>;

    /// A `Complete` upload with the same content hash, if any (dedup probe).
    async fn get_complete_by_hash(
        &self,
        hash: &str,
        hash_algorithm: &HashAlgorithm,
    ) -> anyhow::Result<Option<Upload>>;

    async fn insert(&self, upload: &Upload) -> anyhow::Result<()>;

    async fn update(&self, upload: &Upload) -> anyhow::Result<()>;

    async fn remove(&self, uid: &UploadUid) -> anyhow::Result<()>;
}
