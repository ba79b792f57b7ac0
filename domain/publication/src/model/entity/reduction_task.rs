use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::vo::SelectionCriteria;

/// One reduction attempt producing the artifact of one selection group from
/// one publication request.
///
/// `selection_criteria` is snapshotted when the request enters `Processing`
/// and never changes afterwards, even if the live group criteria do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReductionTask {
    pub id: Uuid,
    pub selection_group_id: Uuid,
    pub publication_request_id: Uuid,
    pub status: ReductionTaskStatus,
    pub message: Option<String>,
    pub selection_criteria: SelectionCriteria,
    pub created_at_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReductionTaskStatus {
    #[default]
    Pending,
    Reducing,
    /// Terminal success: the group's live artifact has been swapped out.
    Replaced,
    /// Terminal failure: the group's prior live artifact is untouched.
    Failed,
}

impl std::fmt::Display for ReductionTaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Reducing => write!(f, "Reducing"),
            Self::Replaced => write!(f, "Replaced"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

impl ReductionTask {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            ReductionTaskStatus::Replaced | ReductionTaskStatus::Failed
        )
    }
}
