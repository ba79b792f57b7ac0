use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use domain_publication::{
    exception::{PromotionException, PromotionResult},
    service::{PromotionService, ServingPathResolver},
};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Go-live by atomic rename.
///
/// The new artifact is staged next to the target and swapped in with one
/// `rename`, so readers see the old file or the new file and nothing in
/// between. The replaced file is kept at `<target>.prev` until the next
/// successful promotion of the same target.
#[derive(TypedBuilder, Default)]
pub struct GoLivePromotionServiceImpl {
    #[builder(default)]
    target_locks: DashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>,
}

fn unwritable(path: &Path) -> impl FnOnce(std::io::Error) -> PromotionException + '_ {
    move |source| PromotionException::DestinationUnwritable {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl PromotionService for GoLivePromotionServiceImpl {
    async fn promote(&self, target: &Path, new_artifact: &Path) -> PromotionResult<()> {
        if !tokio::fs::try_exists(new_artifact).await.unwrap_or(false) {
            return Err(PromotionException::SourceMissing {
                path: new_artifact.to_path_buf(),
            });
        }

        // One promotion per target at a time; other targets proceed freely.
        let lock =
            self.target_locks.entry(target.to_path_buf()).or_default().clone();
        let _guard = lock.lock().await;

        let parent = target.parent().ok_or_else(|| {
            PromotionException::DestinationUnwritable {
                path: target.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "target has no parent directory",
                ),
            }
        })?;
        tokio::fs::create_dir_all(parent).await.map_err(unwritable(target))?;

        let staging = parent.join(format!(
            ".{}.staging",
            target.file_name().and_then(|n| n.to_str()).unwrap_or("artifact")
        ));
        tokio::fs::copy(new_artifact, &staging).await.map_err(unwritable(target))?;

        // Retain the artifact being replaced for manual rollback.
        if tokio::fs::try_exists(target).await.map_err(unwritable(target))? {
            let previous = target.with_file_name(format!(
                "{}.prev",
                target.file_name().and_then(|n| n.to_str()).unwrap_or("artifact")
            ));
            tokio::fs::copy(target, &previous).await.map_err(unwritable(target))?;
        }

        tokio::fs::rename(&staging, target).await.map_err(unwritable(target))?;
        tracing::info!(target = %target.display(), "artifact promoted");
        Ok(())
    }
}

/// Serving tree layout: `<root>/<item>/master` and
/// `<root>/<item>/groups/<group>`.
#[derive(TypedBuilder, Clone)]
pub struct LocalServingPathResolver {
    #[builder(setter(into))]
    serving_root: PathBuf,
}

impl ServingPathResolver for LocalServingPathResolver {
    fn master_path(&self, root_content_item_id: Uuid) -> PathBuf {
        self.serving_root.join(root_content_item_id.to_string()).join("master")
    }

    fn group_path(&self, root_content_item_id: Uuid, selection_group_id: Uuid) -> PathBuf {
        self.serving_root
            .join(root_content_item_id.to_string())
            .join("groups")
            .join(selection_group_id.to_string())
    }
}
