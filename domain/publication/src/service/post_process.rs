use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::PublicationRequest;

/// One independent follow-up of a confirmed publication, e.g. refreshing
/// report-server metadata.
#[async_trait]
pub trait PostProcessAction: Send + Sync {
    fn name(&self) -> &str;

    async fn execute(&self, request: &PublicationRequest) -> anyhow::Result<()>;
}

/// # Publication post-processing
///
/// Runs only after a request reaches `Confirmed`. Each action is
/// best-effort: failures are audited for operators and never revert the
/// confirmed status or any promoted artifact.
#[async_trait]
pub trait PostProcessService: Send + Sync {
    async fn run(&self, request_id: Uuid) -> anyhow::Result<()>;
}
