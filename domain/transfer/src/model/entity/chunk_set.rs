use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::vo::UploadUid;

/// Chunk presence of one upload; exclusively owned by that upload.
///
/// `present ⊆ [0, total_chunks)` is maintained by the chunk store, which
/// rejects out-of-range writes before touching this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSet {
    pub upload_uid: UploadUid,
    pub present: BTreeSet<u64>,
}

impl ChunkSet {
    pub fn new(upload_uid: UploadUid) -> Self {
        Self {
            upload_uid,
            present: BTreeSet::new(),
        }
    }

    /// Chunk numbers not yet written, in ascending order.
    pub fn missing(&self, total_chunks: u64) -> Vec<u64> {
        (0..total_chunks).filter(|nth| !self.present.contains(nth)).collect()
    }

    /// The upload is eligible for finalization iff every chunk is present.
    pub fn is_complete(&self, total_chunks: u64) -> bool {
        self.present.len() as u64 == total_chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_is_the_complement_of_present() {
        let mut set = ChunkSet::new(UploadUid::derive("a.qvw", "ABC"));
        set.present.insert(0);
        set.present.insert(2);
        assert_eq!(set.missing(4), vec![1, 3]);
        assert!(!set.is_complete(4));
        set.present.insert(1);
        set.present.insert(3);
        assert!(set.is_complete(4));
        assert!(set.missing(4).is_empty());
    }
}
