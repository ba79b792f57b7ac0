use async_trait::async_trait;
use uuid::Uuid;

use crate::exception::PublicationResult;
use crate::model::vo::{PublicationStatusView, RelatedFile};

/// # Publication service
///
/// Entry point of the publication pipeline. `publish` validates the master
/// upload, claims the item's single `Processing` slot and snapshots one
/// reduction task per existing selection group; everything afterwards runs
/// on background queues and is observed through `status_view`.
#[async_trait]
pub trait PublicationService: Send + Sync {
    /// Start a publication attempt; returns the pollable request id.
    ///
    /// A second attempt while one is `Processing` is rejected immediately
    /// with `ConcurrencyConflict`, not queued.
    async fn publish(
        &self,
        root_content_item_id: Uuid,
        related_files: Vec<RelatedFile>,
        requesting_user_id: Uuid,
    ) -> PublicationResult<Uuid>;

    async fn status_view(&self, request_id: Uuid) -> PublicationResult<PublicationStatusView>;
}
