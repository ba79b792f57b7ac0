use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::RootContentItem;

#[async_trait]
pub trait RootContentItemRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<RootContentItem>>;

    async fn insert(&self, item: &RootContentItem) -> anyhow::Result<()>;
}
