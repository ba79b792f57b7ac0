use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::{PublicationStatus, ReductionTaskStatus};

/// Status change flowing through the status queue.
#[derive(Serialize, Deserialize)]
pub struct ChangeMsg {
    pub id: Uuid,
    pub info: Info,
}

#[derive(Serialize, Deserialize)]
pub enum Info {
    Publication(PublicationChangeInfo),
    Reduction(ReductionChangeInfo),
}

#[derive(Default, Serialize, Deserialize)]
pub struct PublicationChangeInfo {
    pub status: PublicationStatusChange,
    pub message: Option<String>,
}

#[derive(Default, Serialize, Deserialize)]
pub struct ReductionChangeInfo {
    pub status: ReductionStatusChange,
    pub message: Option<String>,
}

#[derive(Default, Serialize, Deserialize, Clone, Copy)]
pub enum PublicationStatusChange {
    #[default]
    Processing,
    Confirmed,
    Failed,
}

#[derive(Default, Serialize, Deserialize, Clone, Copy)]
pub enum ReductionStatusChange {
    #[default]
    Pending,
    Reducing,
    Replaced,
    Failed,
}

impl From<PublicationStatusChange> for PublicationStatus {
    fn from(value: PublicationStatusChange) -> Self {
        match value {
            PublicationStatusChange::Processing => Self::Processing,
            PublicationStatusChange::Confirmed => Self::Confirmed,
            PublicationStatusChange::Failed => Self::Failed,
        }
    }
}

impl From<ReductionStatusChange> for ReductionTaskStatus {
    fn from(value: ReductionStatusChange) -> Self {
        match value {
            ReductionStatusChange::Pending => Self::Pending,
            ReductionStatusChange::Reducing => Self::Reducing,
            ReductionStatusChange::Replaced => Self::Replaced,
            ReductionStatusChange::Failed => Self::Failed,
        }
    }
}
