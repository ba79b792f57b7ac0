use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use domain_publication::{
    model::entity::{AuditRecord, PublicationStatus},
    repository::{AuditRecordRepo, PublicationRequestRepo},
    service::{PostProcessAction, PostProcessService},
};
use typed_builder::TypedBuilder;
use uuid::Uuid;

#[derive(TypedBuilder)]
pub struct PostProcessServiceImpl {
    request_repo: Arc<dyn PublicationRequestRepo>,
    audit_repo: Arc<dyn AuditRecordRepo>,
    actions: Vec<Arc<dyn PostProcessAction>>,
}

#[async_trait]
impl PostProcessService for PostProcessServiceImpl {
    async fn run(&self, request_id: Uuid) -> anyhow::Result<()> {
        let request = self
            .request_repo
            .get_by_id(request_id)
            .await?
            .ok_or(anyhow!("No such publication request: {request_id}"))?;
        if request.status != PublicationStatus::Confirmed {
            anyhow::bail!(
                "post-processing only runs for Confirmed requests, {request_id} is {}",
                request.status
            );
        }

        for action in &self.actions {
            // Independent and best-effort: a failure is audited for
            // operators, the publisher keeps seeing Confirmed.
            let outcome = action.execute(&request).await;
            let succeeded = outcome.is_ok();
            let message = outcome.err().map(|e| format!("{e:#}"));
            if let Some(m) = &message {
                tracing::warn!(
                    action = action.name(),
                    %request_id,
                    "post-processing action failed: {m}"
                );
            }
            self.audit_repo
                .insert(&AuditRecord {
                    id: Uuid::new_v4(),
                    publication_request_id: request_id,
                    action: action.name().to_string(),
                    succeeded,
                    message,
                    created_at_utc: Utc::now(),
                })
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use domain_publication::{
        mock::{MockAuditRecordRepo, MockPostProcessAction, MockPublicationRequestRepo},
        model::entity::PublicationRequest,
    };

    use super::*;

    fn confirmed_request() -> PublicationRequest {
        PublicationRequest {
            id: Uuid::new_v4(),
            root_content_item_id: Uuid::new_v4(),
            requesting_user_id: Uuid::new_v4(),
            status: PublicationStatus::Confirmed,
            message: None,
            related_files: vec![],
            created_at_utc: Utc::now(),
        }
    }

    #[tokio::test]
    async fn failing_action_is_audited_and_does_not_abort_the_rest() {
        let request = confirmed_request();
        let id = request.id;

        let mut request_repo = MockPublicationRequestRepo::new();
        request_repo.expect_get_by_id().return_once(move |_| Ok(Some(request)));

        let mut failing = MockPostProcessAction::new();
        failing.expect_name().return_const("refresh-report-server".to_string());
        failing
            .expect_execute()
            .return_once(|_| Err(anyhow!("report server unreachable")));
        let mut succeeding = MockPostProcessAction::new();
        succeeding.expect_name().return_const("notify-operators".to_string());
        succeeding.expect_execute().return_once(|_| Ok(()));

        let mut audit_repo = MockAuditRecordRepo::new();
        audit_repo.expect_insert().times(2).returning(move |record| {
            assert_eq!(record.publication_request_id, id);
            match record.action.as_str() {
                "refresh-report-server" => assert!(!record.succeeded),
                "notify-operators" => assert!(record.succeeded),
                other => panic!("unexpected action: {other}"),
            }
            Ok(())
        });

        let service = PostProcessServiceImpl::builder()
            .request_repo(Arc::new(request_repo))
            .audit_repo(Arc::new(audit_repo))
            .actions(vec![Arc::new(failing), Arc::new(succeeding)])
            .build();
        service.run(id).await.unwrap();
    }

    #[tokio::test]
    async fn unconfirmed_requests_are_not_post_processed() {
        let mut request = confirmed_request();
        request.status = PublicationStatus::Failed;
        let id = request.id;
        let mut request_repo = MockPublicationRequestRepo::new();
        request_repo.expect_get_by_id().return_once(move |_| Ok(Some(request)));

        let service = PostProcessServiceImpl::builder()
            .request_repo(Arc::new(request_repo))
            .audit_repo(Arc::new(MockAuditRecordRepo::new()))
            .actions(vec![])
            .build();
        assert!(service.run(id).await.is_err());
    }
}
