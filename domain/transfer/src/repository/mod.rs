mod chunk_set;
mod upload;

#[rustfmt::skip]
pub use {
    chunk_set::ChunkSetRepo,
    upload::UploadRepo,
};
