use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::SelectionGroup;

#[async_trait]
pub trait SelectionGroupRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<SelectionGroup>>;

    async fn get_all_by_root_item(
        &self,
        root_content_item_id: Uuid,
    ) -> anyhow::Result<Vec<SelectionGroup>>;

    async fn insert(&self, group: &SelectionGroup) -> anyhow::Result<()>;
}
