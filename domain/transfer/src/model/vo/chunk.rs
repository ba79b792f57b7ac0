use super::UploadUid;

/// One chunk of a resumable transfer.
pub struct Chunk {
    pub uid: UploadUid,
    /// 0-based chunk number.
    pub nth: u64,
    pub content: Vec<u8>,
}
