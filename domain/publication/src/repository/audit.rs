use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::AuditRecord;

#[async_trait]
pub trait AuditRecordRepo: Send + Sync {
    async fn insert(&self, record: &AuditRecord) -> anyhow::Result<()>;

    async fn get_by_request(
        &self,
        publication_request_id: Uuid,
    ) -> anyhow::Result<Vec<AuditRecord>>;
}
