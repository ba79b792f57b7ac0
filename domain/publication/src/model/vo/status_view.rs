use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::{PublicationStatus, ReductionTaskStatus};

/// Polling view of one publication request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationStatusView {
    pub id: Uuid,
    pub status: PublicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub selection_groups: Vec<SelectionGroupStatusView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionGroupStatusView {
    pub selection_group_id: Uuid,
    pub group_name: String,
    pub reduction_task_id: Uuid,
    pub status: ReductionTaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
