use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::vo::{HashAlgorithm, ResumableInfo, UploadUid};

/// A single binary transfer, in progress or complete.
///
/// The uid is content-addressed (file name + declared hash), so re-sending
/// identical bytes resolves to the same record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upload {
    pub uid: UploadUid,
    pub file_name: String,
    /// Declared hash of the whole file, verified at finalize.
    pub hash: String,
    pub hash_algorithm: HashAlgorithm,
    pub total_size: u64,
    /// Nominal chunk size; the last chunk is sized by remainder.
    pub chunk_size: u64,
    pub total_chunks: u64,
    pub status: UploadStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    Uploading,
    Verifying,
    Complete,
    Error,
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uploading => write!(f, "Uploading"),
            Self::Verifying => write!(f, "Verifying"),
            Self::Complete => write!(f, "Complete"),
            Self::Error => write!(f, "Error"),
        }
    }
}

impl Upload {
    /// New record in `Uploading`, created when the first chunk arrives.
    pub fn from_info(info: &ResumableInfo) -> Self {
        Self {
            uid: info.uid.clone(),
            file_name: info.file_name.clone(),
            hash: info.checksum.to_uppercase(),
            hash_algorithm: info.hash_algorithm,
            total_size: info.total_size,
            chunk_size: info.chunk_size,
            total_chunks: info.total_chunks,
            status: UploadStatus::Uploading,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this record describes the same transfer as `info`.
    pub fn matches(&self, info: &ResumableInfo) -> bool {
        self.hash == info.checksum.to_uppercase()
            && self.hash_algorithm == info.hash_algorithm
            && self.total_size == info.total_size
            && self.chunk_size == info.chunk_size
            && self.total_chunks == info.total_chunks
    }
}
