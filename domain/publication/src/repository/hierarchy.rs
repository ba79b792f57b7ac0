use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::{HierarchyField, HierarchyFieldValue};

#[async_trait]
pub trait HierarchyRepo: Send + Sync {
    async fn get_field(&self, field_id: Uuid) -> anyhow::Result<Option<HierarchyField>>;

    /// Resolve value ids to values; unknown ids are an error, a selection
    /// must never silently shrink.
    async fn get_values_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<HierarchyFieldValue>>;

    async fn insert_field(&self, field: &HierarchyField) -> anyhow::Result<()>;

    async fn insert_value(&self, value: &HierarchyFieldValue) -> anyhow::Result<()>;
}
