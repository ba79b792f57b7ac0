mod chunk;
mod hash_algo;
mod resumable;

#[rustfmt::skip]
pub use {
    chunk::Chunk,
    hash_algo::HashAlgorithm,
    resumable::{ResumableInfo, UploadUid},
};
