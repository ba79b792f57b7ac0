use async_trait::async_trait;

use crate::model::{entity::ChunkSet, vo::UploadUid};

#[async_trait]
pub trait ChunkSetRepo: Send + Sync {
    async fn get(&self, uid: &UploadUid) -> anyhow::Result<Option<ChunkSet>>;

    async fn insert(&self, chunk_set: &ChunkSet) -> anyhow::Result<()>;

    /// Mark chunk `nth` present and return the updated set.
    ///
    /// Must be atomic under concurrent calls for the same uid; the stored
    /// presence must be durable before this returns, because clients resume
    /// from the status read.
    async fn mark_present(&self, uid: &UploadUid, nth: u64) -> anyhow::Result<ChunkSet>;

    async fn remove(&self, uid: &UploadUid) -> anyhow::Result<()>;
}
