use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use domain_publication::{
    command::PostProcessCommand,
    model::vo::msg::{PublicationChangeInfo, PublicationStatusChange},
    repository::PublicationRequestRepo,
    service::ScheduleService,
};
use infrastructure_queue::MessageQueueProducerTemplate;
use typed_builder::TypedBuilder;
use uuid::Uuid;

#[derive(TypedBuilder)]
pub struct PublicationScheduleServiceImpl {
    request_repo: Arc<dyn PublicationRequestRepo>,
    post_process_sender: Arc<dyn MessageQueueProducerTemplate<PostProcessCommand>>,
    post_process_topic: String,
}

#[async_trait]
impl ScheduleService for PublicationScheduleServiceImpl {
    type Info = PublicationChangeInfo;

    async fn handle_changed(&self, id: Uuid, info: Self::Info) -> anyhow::Result<()> {
        match info.status {
            PublicationStatusChange::Processing => Ok(()),
            PublicationStatusChange::Confirmed => {
                // Post-processing is best-effort and runs off the queue;
                // the publisher already sees Confirmed.
                self.post_process_sender
                    .send_object(&PostProcessCommand { request_id: id }, &self.post_process_topic)
                    .await
            }
            PublicationStatusChange::Failed => Ok(()),
        }
    }

    async fn change(&self, id: Uuid, info: Self::Info) -> anyhow::Result<()> {
        let mut request = self
            .request_repo
            .get_by_id(id)
            .await?
            .ok_or(anyhow!("No such publication request: {id}"))?;
        if request.is_terminal() {
            tracing::warn!(
                request_id = %id,
                status = %request.status,
                "ignoring change of terminal request"
            );
            return Ok(());
        }
        request.status = info.status.into();
        if info.message.is_some() {
            request.message = info.message.clone();
        }
        self.request_repo.update(&request).await?;
        if request.is_terminal() {
            // Free the item's single-Processing slot for the next attempt.
            self.request_repo
                .release_processing(request.root_content_item_id, request.id)
                .await?;
        }
        tracing::info!(request_id = %id, status = %request.status, "publication status changed");

        self.handle_changed(id, info).await
    }
}
