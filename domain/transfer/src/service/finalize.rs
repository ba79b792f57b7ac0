use async_trait::async_trait;

use crate::exception::TransferResult;
use crate::model::{entity::Upload, vo::UploadUid};

/// # Upload finalize service
///
/// Assembles a complete chunk set in order, verifies the declared checksum
/// and moves the artifact to permanent storage. A hash mismatch marks the
/// upload `Error` and keeps the scratch chunks so the client can re-send the
/// bad ones; a match that hits an already stored artifact with the same hash
/// is a cheap success reusing it.
///
/// Runs on a background worker, never inline with a chunk request.
#[async_trait]
pub trait UploadFinalizeService: Send + Sync {
    async fn try_finalize(&self, uid: &UploadUid) -> TransferResult<Upload>;
}
