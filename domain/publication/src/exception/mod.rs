use std::path::PathBuf;

use domain_transfer::model::{entity::UploadStatus, vo::UploadUid};
use uuid::Uuid;

pub type PublicationResult<T> = Result<T, PublicationException>;
pub type ReductionResult<T> = Result<T, ReductionException>;
pub type PromotionResult<T> = Result<T, PromotionException>;

#[derive(Debug, thiserror::Error)]
pub enum PublicationException {
    #[error(
        "Root content item {root_content_item_id} already has request {processing_request_id} in Processing."
    )]
    ConcurrencyConflict {
        root_content_item_id: Uuid,
        processing_request_id: Uuid,
    },

    #[error("No root content item with id: {id}.")]
    RootContentItemNotFound { id: Uuid },

    #[error("No publication request with id: {id}.")]
    RequestNotFound { id: Uuid },

    #[error("No reduction task with id: {id}.")]
    TaskNotFound { id: Uuid },

    #[error("A publication needs exactly one master related file, got {count}.")]
    MasterFileMissing { count: usize },

    #[error("No upload is known for master file uid: {uid}.")]
    MasterUploadUnknown { uid: UploadUid },

    #[error("Master upload {uid} is {status}; publication needs a Complete upload.")]
    MasterUploadNotComplete {
        uid: UploadUid,
        status: UploadStatus,
    },

    #[error("User {user_id} may not {action} {resource}.")]
    Forbidden {
        user_id: Uuid,
        action: String,
        resource: String,
    },

    #[error("Publication internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for PublicationException {
    fn from(e: anyhow::Error) -> Self {
        PublicationException::InternalError { source: e }
    }
}

/// Fatal per-task reduction failures; partial output is never produced.
#[derive(Debug, thiserror::Error)]
pub enum ReductionException {
    #[error("Can't read reduction source {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record on line {line} isn't a JSON object: {reason}.")]
    MalformedRecord { line: usize, reason: String },

    #[error("Record on line {line} has no value for hierarchy field: {field}.")]
    MissingField { line: usize, field: String },

    #[error("Record on line {line} carries a non-text value for hierarchy field: {field}.")]
    NonTextField { line: usize, field: String },

    #[error("Can't write reduced output {path}: {source}")]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PromotionException {
    #[error("New artifact {path} is missing.")]
    SourceMissing { path: PathBuf },

    #[error("Serving destination {path} is unwritable: {source}")]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
