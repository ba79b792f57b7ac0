use async_trait::async_trait;
use uuid::Uuid;

/// External capability gate consulted at every pipeline entry point.
///
/// The role-hierarchy logic behind it lives outside this system.
#[async_trait]
pub trait AccessControlService: Send + Sync {
    async fn can_perform(
        &self,
        user_id: Uuid,
        action: &str,
        resource: &str,
    ) -> anyhow::Result<bool>;
}
