use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::exception::PromotionResult;

/// # Go-live promotion service
///
/// Atomically replaces the path content-serving reads from; a concurrent
/// reader sees either the old artifact or the new one, never a truncated
/// file. On failure the previous artifact is left fully intact. The
/// replaced artifact is retained until the next successful promotion of the
/// same target, enabling manual rollback.
///
/// Promotions to the same target are mutually exclusive; different targets
/// may promote concurrently.
#[async_trait]
pub trait PromotionService: Send + Sync {
    async fn promote(&self, target: &Path, new_artifact: &Path) -> PromotionResult<()>;
}

/// Where artifacts are served from.
pub trait ServingPathResolver: Send + Sync {
    fn master_path(&self, root_content_item_id: Uuid) -> PathBuf;

    fn group_path(&self, root_content_item_id: Uuid, selection_group_id: Uuid) -> PathBuf;
}
