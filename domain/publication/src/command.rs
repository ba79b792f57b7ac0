use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Queue payload: run one snapshotted reduction task.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReductionCommand {
    pub task_id: Uuid,
}

/// Queue payload: promote the master artifact of a non-reducing request.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteMasterCommand {
    pub request_id: Uuid,
}

/// Queue payload: best-effort post-processing of a confirmed request.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostProcessCommand {
    pub request_id: Uuid,
}
