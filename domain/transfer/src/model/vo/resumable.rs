use serde::{Deserialize, Serialize};

use super::HashAlgorithm;

/// Content-addressed upload identifier: `<sanitized file name>_<hash>`.
///
/// Derived, never random, so identical (name, checksum) pairs collapse onto
/// one record and scratch/artifact paths never embed a raw user file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadUid(String);

impl UploadUid {
    pub fn derive(file_name: &str, checksum: &str) -> Self {
        let sanitized: String = file_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        Self(format!("{sanitized}_{}", checksum.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UploadUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UploadUid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Wire model of one resumable transfer, sent with every chunk request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumableInfo {
    pub uid: UploadUid,
    /// Display name only; storage paths are derived from `uid`.
    pub file_name: String,
    /// Client-computed hash of the whole file.
    pub checksum: String,
    pub hash_algorithm: HashAlgorithm,
    pub total_size: u64,
    pub chunk_size: u64,
    pub total_chunks: u64,
}

impl ResumableInfo {
    /// The uid this info should carry; callers reject a mismatch.
    pub fn derived_uid(&self) -> UploadUid {
        UploadUid::derive(&self.file_name, &self.checksum)
    }

    /// Layout sanity: sizes and counts must describe the same byte stream.
    pub fn layout_error(&self) -> Option<String> {
        if self.total_chunks == 0 {
            return Some("total chunk count is zero".to_string());
        }
        if self.chunk_size == 0 {
            return Some("chunk size is zero".to_string());
        }
        let full = self.chunk_size * (self.total_chunks - 1);
        if self.total_size <= full || self.total_size > full + self.chunk_size {
            return Some(format!(
                "total size {} doesn't fit {} chunks of {} bytes",
                self.total_size, self.total_chunks, self.chunk_size
            ));
        }
        None
    }

    /// Expected byte count of chunk `nth`; the last chunk carries the
    /// remainder. Callers guarantee `nth < total_chunks`.
    pub fn expected_chunk_size(&self, nth: u64) -> u64 {
        if nth + 1 == self.total_chunks {
            self.total_size - self.chunk_size * (self.total_chunks - 1)
        } else {
            self.chunk_size
        }
    }
}
