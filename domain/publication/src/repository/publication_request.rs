use async_trait::async_trait;
use uuid::Uuid;

use crate::model::entity::PublicationRequest;

#[async_trait]
pub trait PublicationRequestRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<PublicationRequest>>;

    /// Insert `request` as the single `Processing` request of its item.
    ///
    /// Atomic: when another request for the same root content item is
    /// already `Processing`, nothing is written and that request's id is
    /// returned. `None` means the claim succeeded.
    async fn claim_processing(
        &self,
        request: &PublicationRequest,
    ) -> anyhow::Result<Option<Uuid>>;

    /// Drop the item's `Processing` claim held by `request_id`, called on
    /// the transition to a terminal status.
    async fn release_processing(
        &self,
        root_content_item_id: Uuid,
        request_id: Uuid,
    ) -> anyhow::Result<()>;

    async fn update(&self, request: &PublicationRequest) -> anyhow::Result<()>;
}
