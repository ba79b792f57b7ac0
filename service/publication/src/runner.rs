use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use domain_publication::{
    model::vo::msg::{
        ChangeMsg, Info, PublicationChangeInfo, PublicationStatusChange, ReductionChangeInfo,
        ReductionStatusChange,
    },
    repository::{PublicationRequestRepo, ReductionTaskRepo, SelectionGroupRepo},
    service::{PromotionService, ReductionEngine, ServingPathResolver},
};
use domain_transfer::{repository::UploadRepo, service::ArtifactStoreService};
use infrastructure_queue::MessageQueueProducerTemplate;
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Executes one reduction task end to end: reduce the master into a fresh
/// output, then promote it into the group's serving path. Any failure,
/// including a timeout, terminates the task as `Failed`; the group's prior
/// live artifact stays untouched. Outcomes are reported onto the status
/// queue, never back to a caller.
#[derive(TypedBuilder)]
pub struct ReductionRunner {
    task_repo: Arc<dyn ReductionTaskRepo>,
    request_repo: Arc<dyn PublicationRequestRepo>,
    selection_group_repo: Arc<dyn SelectionGroupRepo>,
    upload_repo: Arc<dyn UploadRepo>,
    artifact_store: Arc<dyn ArtifactStoreService>,
    engine: Arc<dyn ReductionEngine>,
    promotion: Arc<dyn PromotionService>,
    serving_paths: Arc<dyn ServingPathResolver>,
    status_sender: Arc<dyn MessageQueueProducerTemplate<ChangeMsg>>,
    status_topic: String,
    #[builder(default = "reduced_dir".into(), setter(into))]
    reduced_base: PathBuf,
    #[builder(default = Duration::from_secs(600))]
    op_timeout: Duration,
}

impl ReductionRunner {
    pub async fn run(&self, task_id: Uuid) -> anyhow::Result<()> {
        let task = self
            .task_repo
            .get_by_id(task_id)
            .await?
            .ok_or(anyhow!("No such reduction task: {task_id}"))?;
        if task.is_terminal() {
            tracing::warn!(%task_id, "skipping re-delivered terminal task");
            return Ok(());
        }

        self.send_status(
            task_id,
            ReductionChangeInfo {
                status: ReductionStatusChange::Reducing,
                ..Default::default()
            },
        )
        .await?;

        // A timed-out step terminates exactly like a functional failure;
        // retry is a new publication attempt, never a silent re-run.
        let outcome = tokio::time::timeout(self.op_timeout, self.reduce_and_promote(task_id))
            .await
            .unwrap_or_else(|_| {
                Err(anyhow!(
                    "reduction timed out after {}s",
                    self.op_timeout.as_secs()
                ))
            });

        let info = match outcome {
            Ok(()) => ReductionChangeInfo {
                status: ReductionStatusChange::Replaced,
                ..Default::default()
            },
            Err(e) => {
                tracing::error!(%task_id, "reduction task failed: {e:#}");
                ReductionChangeInfo {
                    status: ReductionStatusChange::Failed,
                    message: Some(e.to_string()),
                }
            }
        };
        self.send_status(task_id, info).await
    }

    async fn send_status(&self, task_id: Uuid, info: ReductionChangeInfo) -> anyhow::Result<()> {
        self.status_sender
            .send_object(
                &ChangeMsg {
                    id: task_id,
                    info: Info::Reduction(info),
                },
                &self.status_topic,
            )
            .await
    }

    async fn reduce_and_promote(&self, task_id: Uuid) -> anyhow::Result<()> {
        let task = self
            .task_repo
            .get_by_id(task_id)
            .await?
            .ok_or(anyhow!("No such reduction task: {task_id}"))?;
        let request = self
            .request_repo
            .get_by_id(task.publication_request_id)
            .await?
            .ok_or(anyhow!(
                "No such publication request: {}",
                task.publication_request_id
            ))?;
        let master = request
            .master_file()
            .ok_or(anyhow!("request {} has no master file", request.id))?;
        let upload = self
            .upload_repo
            .get_by_uid(&master.upload_uid)
            .await?
            .ok_or(anyhow!("no upload for master uid: {}", master.upload_uid))?;
        let group = self
            .selection_group_repo
            .get_by_id(task.selection_group_id)
            .await?
            .ok_or(anyhow!("no selection group: {}", task.selection_group_id))?;

        let master_path = self.artifact_store.path_of(&upload.hash);
        let output = self.reduced_base.join(task_id.to_string());
        self.engine.reduce(&master_path, &task.selection_criteria, &output).await?;

        let target = self
            .serving_paths
            .group_path(request.root_content_item_id, group.id);
        self.promotion.promote(&target, &output).await?;
        Ok(())
    }
}

/// Promotes the master artifact of a request with no selection groups (or a
/// non-reducing content kind) and confirms or fails the request.
#[derive(TypedBuilder)]
pub struct MasterPromoteRunner {
    request_repo: Arc<dyn PublicationRequestRepo>,
    upload_repo: Arc<dyn UploadRepo>,
    artifact_store: Arc<dyn ArtifactStoreService>,
    promotion: Arc<dyn PromotionService>,
    serving_paths: Arc<dyn ServingPathResolver>,
    status_sender: Arc<dyn MessageQueueProducerTemplate<ChangeMsg>>,
    status_topic: String,
    #[builder(default = Duration::from_secs(600))]
    op_timeout: Duration,
}

impl MasterPromoteRunner {
    pub async fn run(&self, request_id: Uuid) -> anyhow::Result<()> {
        let request = self
            .request_repo
            .get_by_id(request_id)
            .await?
            .ok_or(anyhow!("No such publication request: {request_id}"))?;
        if request.is_terminal() {
            tracing::warn!(%request_id, "skipping re-delivered terminal request");
            return Ok(());
        }

        let outcome = tokio::time::timeout(self.op_timeout, self.promote_master(request_id))
            .await
            .unwrap_or_else(|_| {
                Err(anyhow!(
                    "master promotion timed out after {}s",
                    self.op_timeout.as_secs()
                ))
            });

        let info = match outcome {
            Ok(()) => PublicationChangeInfo {
                status: PublicationStatusChange::Confirmed,
                ..Default::default()
            },
            Err(e) => {
                tracing::error!(%request_id, "master promotion failed: {e:#}");
                PublicationChangeInfo {
                    status: PublicationStatusChange::Failed,
                    message: Some(e.to_string()),
                }
            }
        };
        self.status_sender
            .send_object(
                &ChangeMsg {
                    id: request_id,
                    info: Info::Publication(info),
                },
                &self.status_topic,
            )
            .await
    }

    async fn promote_master(&self, request_id: Uuid) -> anyhow::Result<()> {
        let request = self
            .request_repo
            .get_by_id(request_id)
            .await?
            .ok_or(anyhow!("No such publication request: {request_id}"))?;
        let master = request
            .master_file()
            .ok_or(anyhow!("request {request_id} has no master file"))?;
        let upload = self
            .upload_repo
            .get_by_uid(&master.upload_uid)
            .await?
            .ok_or(anyhow!("no upload for master uid: {}", master.upload_uid))?;

        let artifact = self.artifact_store.path_of(&upload.hash);
        let target = self.serving_paths.master_path(request.root_content_item_id);
        self.promotion.promote(&target, &artifact).await?;
        Ok(())
    }
}
