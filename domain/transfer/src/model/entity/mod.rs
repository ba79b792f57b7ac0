mod chunk_set;
mod upload;

#[rustfmt::skip]
pub use {
    chunk_set::ChunkSet,
    upload::{Upload, UploadStatus},
};
