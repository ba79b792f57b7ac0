use async_trait::async_trait;

use crate::exception::TransferResult;
use crate::model::{
    entity::Upload,
    vo::{ResumableInfo, UploadUid},
};

/// # Chunk store service
///
/// Server side of the resumable upload protocol. The upload record is
/// created when the first chunk arrives; chunk writes are idempotent so a
/// client may retry after a dropped acknowledgment.
#[async_trait]
pub trait ChunkStoreService: Send + Sync {
    /// Accept one chunk and return the chunk numbers still missing.
    ///
    /// Out-of-range or wrongly sized chunks are rejected without mutating
    /// state. Re-sending an already present chunk is a no-op success.
    async fn write_chunk(
        &self,
        info: &ResumableInfo,
        nth: u64,
        content: Vec<u8>,
    ) -> TransferResult<Vec<u64>>;

    /// Missing chunk numbers; empty means ready to finalize.
    ///
    /// Reflects every acknowledged write, never a stale read.
    async fn missing_chunks(&self, uid: &UploadUid) -> TransferResult<Vec<u64>>;

    async fn upload_status(&self, uid: &UploadUid) -> TransferResult<Upload>;

    /// Discard scratch data and mark the upload `Error`.
    ///
    /// No effect once the upload is `Complete`.
    async fn cancel(&self, uid: &UploadUid) -> TransferResult<()>;
}
