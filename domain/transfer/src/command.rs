use serde::{Deserialize, Serialize};

use crate::model::vo::{Chunk, UploadUid};

/// Queue payload asking the finalize workers to assemble and verify `uid`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeUploadCommand {
    pub uid: UploadUid,
}

pub enum ScratchOperateCommand {
    /// Persist one chunk of an unfinished transfer.
    WriteChunk(Chunk),
    /// Reclaim every chunk of the transfer.
    RemoveChunkDir { uid: UploadUid },
}

pub enum ScratchReadCommand {
    ReadChunk { uid: UploadUid, nth: u64 },
}
