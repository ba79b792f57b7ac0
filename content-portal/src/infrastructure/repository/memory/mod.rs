mod publication;
mod transfer;

#[rustfmt::skip]
pub use {
    publication::{
        InMemoryAuditRecordRepo, InMemoryHierarchyRepo, InMemoryPublicationRequestRepo,
        InMemoryReductionTaskRepo, InMemoryRootContentItemRepo, InMemorySelectionGroupRepo,
    },
    transfer::{InMemoryChunkSetRepo, InMemoryUploadRepo},
};
