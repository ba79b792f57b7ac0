mod artifact;
mod chunk_store;
mod finalize;
mod scratch;

#[rustfmt::skip]
pub use {
    artifact::LocalArtifactStoreServiceImpl,
    chunk_store::ChunkStoreServiceImpl,
    finalize::UploadFinalizeServiceImpl,
    scratch::LocalScratchServiceImpl,
};
