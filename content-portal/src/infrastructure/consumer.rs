//! Stage-queue handlers: deserialize the payload, call the owning service.

use std::sync::Arc;
use std::time::Duration;

use domain_publication::{
    command::{PostProcessCommand, PromoteMasterCommand, RunReductionCommand},
    model::vo::msg::{ChangeMsg, Info},
};
use domain_transfer::{command::FinalizeUploadCommand, model::entity::UploadStatus};
use infrastructure_queue::ConsumerReturn;

use super::ServiceProvider;

pub fn finalize_upload(content: &str, sp: Arc<ServiceProvider>) -> ConsumerReturn<'_> {
    Box::pin(async move {
        let command: FinalizeUploadCommand = serde_json::from_str(content)?;
        let timeout = Duration::from_secs(sp.config.queues.op_timeout_secs);
        match tokio::time::timeout(timeout, sp.finalize_service.try_finalize(&command.uid)).await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                // The terminal outcome already sits on the upload record;
                // polling clients read it from there.
                tracing::warn!(uid = %command.uid, "finalize ended with: {e}");
            }
            Err(_) => {
                // Elapse is terminal, same as a functional failure.
                if let Some(mut upload) = sp.upload_repo.get_by_uid(&command.uid).await? {
                    upload.status = UploadStatus::Error;
                    upload.error_message =
                        Some(format!("finalize timed out after {}s", timeout.as_secs()));
                    sp.upload_repo.update(&upload).await?;
                }
                tracing::error!(uid = %command.uid, "finalize timed out");
            }
        }
        Ok(())
    })
}

pub fn run_reduction(content: &str, sp: Arc<ServiceProvider>) -> ConsumerReturn<'_> {
    Box::pin(async move {
        let command: RunReductionCommand = serde_json::from_str(content)?;
        sp.reduction_runner.run(command.task_id).await
    })
}

pub fn promote_master(content: &str, sp: Arc<ServiceProvider>) -> ConsumerReturn<'_> {
    Box::pin(async move {
        let command: PromoteMasterCommand = serde_json::from_str(content)?;
        sp.master_promote_runner.run(command.request_id).await
    })
}

pub fn status_change(content: &str, sp: Arc<ServiceProvider>) -> ConsumerReturn<'_> {
    Box::pin(async move {
        let msg: ChangeMsg = serde_json::from_str(content)?;
        match msg.info {
            Info::Publication(info) => sp.publication_schedule.change(msg.id, info).await,
            Info::Reduction(info) => sp.reduction_schedule.change(msg.id, info).await,
        }
    })
}

pub fn post_process(content: &str, sp: Arc<ServiceProvider>) -> ConsumerReturn<'_> {
    Box::pin(async move {
        let command: PostProcessCommand = serde_json::from_str(content)?;
        sp.post_process_service.run(command.request_id).await
    })
}
