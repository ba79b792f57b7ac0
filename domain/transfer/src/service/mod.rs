mod artifact;
mod chunk_store;
mod finalize;
mod scratch;

#[rustfmt::skip]
pub use {
    artifact::ArtifactStoreService,
    chunk_store::ChunkStoreService,
    finalize::UploadFinalizeService,
    scratch::ScratchService,
};
