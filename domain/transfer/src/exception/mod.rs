use crate::model::{entity::UploadStatus, vo::UploadUid};

pub type TransferResult<T> = Result<T, TransferException>;

#[derive(Debug, thiserror::Error)]
pub enum TransferException {
    #[error("No upload is known for uid: {uid}.")]
    UnknownUpload { uid: UploadUid },

    #[error("Chunk {nth} is out of range for upload {uid} with {total_chunks} chunks.")]
    ChunkOutOfRange {
        uid: UploadUid,
        nth: u64,
        total_chunks: u64,
    },

    #[error("Chunk {nth} of upload {uid} carries {actual} bytes, expected {expected}.")]
    ChunkSizeMismatch {
        uid: UploadUid,
        nth: u64,
        expected: u64,
        actual: u64,
    },

    #[error("Transfer layout of upload {uid} is inconsistent: {reason}.")]
    InvalidLayout { uid: UploadUid, reason: String },

    #[error("A different transfer is already registered under uid: {uid}.")]
    ConflictingRegistration { uid: UploadUid },

    #[error("Upload {uid} is {status} and no longer accepts chunks.")]
    NotAcceptingChunks {
        uid: UploadUid,
        status: UploadStatus,
    },

    #[error("Upload {uid} still misses {missing} chunks and can't be finalized.")]
    UploadNotComplete { uid: UploadUid, missing: usize },

    #[error(
        "Upload {uid}'s assembled hash: {computed} is unmatched with declared hash: {declared}."
    )]
    ChecksumMismatch {
        uid: UploadUid,
        declared: String,
        computed: String,
    },

    #[error("Transfer internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for TransferException {
    fn from(e: anyhow::Error) -> Self {
        TransferException::InternalError { source: e }
    }
}
