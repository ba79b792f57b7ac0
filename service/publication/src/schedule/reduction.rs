use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use domain_publication::{
    model::{
        entity::ReductionTaskStatus,
        vo::msg::{PublicationChangeInfo, PublicationStatusChange, ReductionChangeInfo,
            ReductionStatusChange},
    },
    repository::ReductionTaskRepo,
    service::ScheduleService,
};
use typed_builder::TypedBuilder;
use uuid::Uuid;

#[derive(TypedBuilder)]
pub struct ReductionScheduleServiceImpl {
    task_repo: Arc<dyn ReductionTaskRepo>,
    publication_schedule: Arc<dyn ScheduleService<Info = PublicationChangeInfo>>,
}

#[async_trait]
impl ScheduleService for ReductionScheduleServiceImpl {
    type Info = ReductionChangeInfo;

    async fn handle_changed(&self, id: Uuid, info: Self::Info) -> anyhow::Result<()> {
        match info.status {
            ReductionStatusChange::Pending | ReductionStatusChange::Reducing => {
                // Nothing to fan in yet.
                Ok(())
            }
            ReductionStatusChange::Replaced => {
                // Confirm the request once every sibling is terminal-success.
                let task = self
                    .task_repo
                    .get_by_id(id)
                    .await?
                    .ok_or(anyhow!("No such reduction task: {id}"))?;
                let siblings =
                    self.task_repo.get_by_request(task.publication_request_id).await?;
                if siblings.iter().all(|t| t.status == ReductionTaskStatus::Replaced) {
                    self.publication_schedule
                        .change(
                            task.publication_request_id,
                            PublicationChangeInfo {
                                status: PublicationStatusChange::Confirmed,
                                ..Default::default()
                            },
                        )
                        .await?;
                }
                Ok(())
            }
            ReductionStatusChange::Failed => {
                // One failed audience fails the whole request; already
                // replaced siblings stay live.
                let task = self
                    .task_repo
                    .get_by_id(id)
                    .await?
                    .ok_or(anyhow!("No such reduction task: {id}"))?;
                self.publication_schedule
                    .change(
                        task.publication_request_id,
                        PublicationChangeInfo {
                            status: PublicationStatusChange::Failed,
                            message: info.message,
                        },
                    )
                    .await?;
                Ok(())
            }
        }
    }

    async fn change(&self, id: Uuid, info: Self::Info) -> anyhow::Result<()> {
        let mut task = self
            .task_repo
            .get_by_id(id)
            .await?
            .ok_or(anyhow!("No such reduction task: {id}"))?;
        if task.is_terminal() {
            tracing::warn!(task_id = %id, status = %task.status, "ignoring change of terminal task");
            return Ok(());
        }
        task.status = info.status.into();
        if info.message.is_some() {
            task.message = info.message.clone();
        }
        self.task_repo.update(&task).await?;

        self.handle_changed(id, info).await
    }
}
