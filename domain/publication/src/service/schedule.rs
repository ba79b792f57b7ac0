use async_trait::async_trait;
use uuid::Uuid;

/// Status-change handler of one pipeline stage.
///
/// `change` persists the new status and then reacts to it; reactions may
/// escalate to the parent stage's schedule service (a terminal reduction
/// task drives its publication request towards Confirmed or Failed).
#[async_trait]
pub trait ScheduleService: Send + Sync {
    type Info: Send + 'static;

    /// React to an already persisted status change.
    async fn handle_changed(&self, id: Uuid, info: Self::Info) -> anyhow::Result<()>;

    /// Persist the change, then handle it.
    async fn change(&self, id: Uuid, info: Self::Info) -> anyhow::Result<()>;
}
