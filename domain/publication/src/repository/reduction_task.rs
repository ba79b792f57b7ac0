use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::ReductionTask;

#[async_trait]
pub trait ReductionTaskRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<ReductionTask>>;

    async fn get_by_request(
        &self,
        publication_request_id: Uuid,
    ) -> anyhow::Result<Vec<ReductionTask>>;

    /// Persist the whole snapshot of one request in a single step.
    async fn insert_many(&self, tasks: &[ReductionTask]) -> anyhow::Result<()>;

    async fn update(&self, task: &ReductionTask) -> anyhow::Result<()>;
}
