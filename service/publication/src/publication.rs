use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use domain_publication::{
    command::{PromoteMasterCommand, RunReductionCommand},
    exception::{PublicationException, PublicationResult},
    model::{
        entity::{
            ContentKind, PublicationRequest, PublicationStatus, ReductionTask, SelectionGroup,
        },
        vo::{
            PublicationStatusView, RelatedFile, RelatedFileKind, SelectionCriteria,
            SelectionCriterion, SelectionGroupStatusView,
        },
    },
    repository::{
        HierarchyRepo, PublicationRequestRepo, ReductionTaskRepo, RootContentItemRepo,
        SelectionGroupRepo,
    },
    service::{AccessControlService, PublicationService},
};
use domain_transfer::{model::entity::UploadStatus, repository::UploadRepo};
use infrastructure_queue::MessageQueueProducerTemplate;
use typed_builder::TypedBuilder;
use uuid::Uuid;

#[derive(TypedBuilder)]
pub struct PublicationServiceImpl {
    root_item_repo: Arc<dyn RootContentItemRepo>,
    selection_group_repo: Arc<dyn SelectionGroupRepo>,
    hierarchy_repo: Arc<dyn HierarchyRepo>,
    request_repo: Arc<dyn PublicationRequestRepo>,
    task_repo: Arc<dyn ReductionTaskRepo>,
    upload_repo: Arc<dyn UploadRepo>,
    access_control: Arc<dyn AccessControlService>,
    reduce_sender: Arc<dyn MessageQueueProducerTemplate<RunReductionCommand>>,
    reduce_topic: String,
    promote_master_sender: Arc<dyn MessageQueueProducerTemplate<PromoteMasterCommand>>,
    promote_master_topic: String,
}

impl PublicationServiceImpl {
    /// Snapshot one group's live criteria into the immutable form a task
    /// runs under. Entries are keyed by field and sorted, so identical
    /// selections always produce an identical snapshot.
    async fn snapshot_criteria(&self, group: &SelectionGroup) -> anyhow::Result<SelectionCriteria> {
        let values = self
            .hierarchy_repo
            .get_values_by_ids(&group.selected_hierarchy_field_value_ids)
            .await?;
        if values.len() != group.selected_hierarchy_field_value_ids.len() {
            anyhow::bail!(
                "selection group {} references unknown hierarchy values",
                group.id
            );
        }

        let mut by_field: BTreeMap<Uuid, Vec<String>> = BTreeMap::new();
        for value in values {
            by_field.entry(value.field_id).or_default().push(value.value);
        }

        let mut entries = Vec::with_capacity(by_field.len());
        for (field_id, mut allowed_values) in by_field {
            let field = self
                .hierarchy_repo
                .get_field(field_id)
                .await?
                .ok_or_else(|| anyhow!("no hierarchy field with id: {field_id}"))?;
            allowed_values.sort();
            allowed_values.dedup();
            entries.push(SelectionCriterion {
                field_id,
                field_name: field.name,
                allowed_values,
            });
        }
        entries.sort_by(|a, b| a.field_name.cmp(&b.field_name));
        Ok(SelectionCriteria { entries })
    }
}

#[async_trait]
impl PublicationService for PublicationServiceImpl {
    async fn publish(
        &self,
        root_content_item_id: Uuid,
        related_files: Vec<RelatedFile>,
        requesting_user_id: Uuid,
    ) -> PublicationResult<Uuid> {
        let resource = root_content_item_id.to_string();
        if !self
            .access_control
            .can_perform(requesting_user_id, "publish", &resource)
            .await?
        {
            return Err(PublicationException::Forbidden {
                user_id: requesting_user_id,
                action: "publish".to_string(),
                resource,
            });
        }

        let item = self
            .root_item_repo
            .get_by_id(root_content_item_id)
            .await?
            .ok_or(PublicationException::RootContentItemNotFound {
                id: root_content_item_id,
            })?;

        let masters: Vec<_> = related_files
            .iter()
            .filter(|f| f.kind == RelatedFileKind::Master)
            .collect();
        if masters.len() != 1 {
            return Err(PublicationException::MasterFileMissing {
                count: masters.len(),
            });
        }
        let master_uid = masters[0].upload_uid.clone();

        let upload = self
            .upload_repo
            .get_by_uid(&master_uid)
            .await?
            .ok_or(PublicationException::MasterUploadUnknown {
                uid: master_uid.clone(),
            })?;
        if upload.status != UploadStatus::Complete {
            return Err(PublicationException::MasterUploadNotComplete {
                uid: master_uid,
                status: upload.status,
            });
        }

        let request = PublicationRequest {
            id: Uuid::new_v4(),
            root_content_item_id,
            requesting_user_id,
            status: PublicationStatus::Processing,
            message: None,
            related_files,
            created_at_utc: Utc::now(),
        };
        // A competing publish on the same item is rejected here, not queued.
        if let Some(processing_request_id) =
            self.request_repo.claim_processing(&request).await?
        {
            return Err(PublicationException::ConcurrencyConflict {
                root_content_item_id,
                processing_request_id,
            });
        }

        // Groups created after this point belong to the next publication.
        let groups = match item.kind {
            ContentKind::Reducible => {
                self.selection_group_repo.get_all_by_root_item(root_content_item_id).await?
            }
            ContentKind::Static => vec![],
        };

        if groups.is_empty() {
            self.promote_master_sender
                .send_object(
                    &PromoteMasterCommand {
                        request_id: request.id,
                    },
                    &self.promote_master_topic,
                )
                .await?;
            return Ok(request.id);
        }

        let mut tasks = Vec::with_capacity(groups.len());
        for group in &groups {
            tasks.push(ReductionTask {
                id: Uuid::new_v4(),
                selection_group_id: group.id,
                publication_request_id: request.id,
                status: Default::default(),
                message: None,
                selection_criteria: self.snapshot_criteria(group).await?,
                created_at_utc: Utc::now(),
            });
        }
        self.task_repo.insert_many(&tasks).await?;

        for task in &tasks {
            self.reduce_sender
                .send_object(&RunReductionCommand { task_id: task.id }, &self.reduce_topic)
                .await?;
        }
        tracing::info!(
            request_id = %request.id,
            tasks = tasks.len(),
            "publication entered Processing"
        );
        Ok(request.id)
    }

    async fn status_view(&self, request_id: Uuid) -> PublicationResult<PublicationStatusView> {
        let request = self
            .request_repo
            .get_by_id(request_id)
            .await?
            .ok_or(PublicationException::RequestNotFound { id: request_id })?;
        let tasks = self.task_repo.get_by_request(request_id).await?;

        let mut selection_groups = Vec::with_capacity(tasks.len());
        for task in tasks {
            let group_name = self
                .selection_group_repo
                .get_by_id(task.selection_group_id)
                .await?
                .map(|g| g.group_name)
                .unwrap_or_else(|| task.selection_group_id.to_string());
            selection_groups.push(SelectionGroupStatusView {
                selection_group_id: task.selection_group_id,
                group_name,
                reduction_task_id: task.id,
                status: task.status,
                message: task.message,
            });
        }
        Ok(PublicationStatusView {
            id: request.id,
            status: request.status,
            message: request.message,
            selection_groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_publication::{
        mock::{
            MockAccessControlService, MockHierarchyRepo, MockPromoteMasterSender,
            MockPublicationRequestRepo, MockReductionSender, MockReductionTaskRepo,
            MockRootContentItemRepo, MockSelectionGroupRepo,
        },
        model::entity::{HierarchyField, HierarchyFieldValue, RootContentItem},
    };
    use domain_transfer::{
        mock::MockUploadRepo,
        model::{
            entity::Upload,
            vo::{HashAlgorithm, ResumableInfo, UploadUid},
        },
    };

    struct Mocks {
        root_item_repo: MockRootContentItemRepo,
        selection_group_repo: MockSelectionGroupRepo,
        hierarchy_repo: MockHierarchyRepo,
        request_repo: MockPublicationRequestRepo,
        task_repo: MockReductionTaskRepo,
        upload_repo: MockUploadRepo,
        access_control: MockAccessControlService,
        reduce_sender: MockReductionSender,
        promote_master_sender: MockPromoteMasterSender,
    }

    fn complete_upload() -> (Upload, RelatedFile) {
        let info = ResumableInfo {
            uid: UploadUid::derive("master.qvw", "AB"),
            file_name: "master.qvw".into(),
            checksum: "AB".into(),
            hash_algorithm: HashAlgorithm::Blake3,
            total_size: 1,
            chunk_size: 1,
            total_chunks: 1,
        };
        let mut upload = Upload::from_info(&info);
        upload.status = UploadStatus::Complete;
        let related = RelatedFile {
            upload_uid: upload.uid.clone(),
            file_name: upload.file_name.clone(),
            kind: RelatedFileKind::Master,
        };
        (upload, related)
    }

    fn mocks(item: RootContentItem) -> Mocks {
        let (upload, _) = complete_upload();
        let mut root_item_repo = MockRootContentItemRepo::new();
        root_item_repo.expect_get_by_id().return_once(move |_| Ok(Some(item)));
        let mut upload_repo = MockUploadRepo::new();
        upload_repo.expect_get_by_uid().return_once(move |_| Ok(Some(upload)));
        let mut access_control = MockAccessControlService::new();
        access_control.expect_can_perform().returning(|_, _, _| Ok(true));
        Mocks {
            root_item_repo,
            selection_group_repo: MockSelectionGroupRepo::new(),
            hierarchy_repo: MockHierarchyRepo::new(),
            request_repo: MockPublicationRequestRepo::new(),
            task_repo: MockReductionTaskRepo::new(),
            upload_repo,
            access_control,
            reduce_sender: MockReductionSender::new(),
            promote_master_sender: MockPromoteMasterSender::new(),
        }
    }

    fn build(m: Mocks) -> PublicationServiceImpl {
        PublicationServiceImpl::builder()
            .root_item_repo(Arc::new(m.root_item_repo))
            .selection_group_repo(Arc::new(m.selection_group_repo))
            .hierarchy_repo(Arc::new(m.hierarchy_repo))
            .request_repo(Arc::new(m.request_repo))
            .task_repo(Arc::new(m.task_repo))
            .upload_repo(Arc::new(m.upload_repo))
            .access_control(Arc::new(m.access_control))
            .reduce_sender(Arc::new(m.reduce_sender))
            .reduce_topic("reduction".into())
            .promote_master_sender(Arc::new(m.promote_master_sender))
            .promote_master_topic("master-promotion".into())
            .build()
    }

    fn reducible_item() -> RootContentItem {
        RootContentItem {
            id: Uuid::new_v4(),
            name: "weekly sales".into(),
            kind: ContentKind::Reducible,
        }
    }

    #[tokio::test]
    async fn second_processing_request_is_rejected_synchronously() {
        let item = reducible_item();
        let item_id = item.id;
        let (_, related) = complete_upload();
        let mut m = mocks(item);
        let winner = Uuid::new_v4();
        m.request_repo.expect_claim_processing().return_once(move |_| Ok(Some(winner)));

        let service = build(m);
        let r = service.publish(item_id, vec![related], Uuid::new_v4()).await;
        assert!(matches!(
            r,
            Err(PublicationException::ConcurrencyConflict { processing_request_id, .. })
                if processing_request_id == winner
        ));
    }

    #[tokio::test]
    async fn reducible_item_snapshots_one_task_per_group() {
        let item = reducible_item();
        let item_id = item.id;
        let (_, related) = complete_upload();
        let mut m = mocks(item);
        m.request_repo.expect_claim_processing().return_once(|_| Ok(None));

        let field = HierarchyField {
            id: Uuid::new_v4(),
            root_content_item_id: item_id,
            name: "Region".into(),
        };
        let value = HierarchyFieldValue {
            id: Uuid::new_v4(),
            field_id: field.id,
            value: "EMEA".into(),
        };
        let groups: Vec<SelectionGroup> = (0..3)
            .map(|n| SelectionGroup {
                id: Uuid::new_v4(),
                root_content_item_id: item_id,
                group_name: format!("group-{n}"),
                content_instance_url: format!("/content/{n}"),
                selected_hierarchy_field_value_ids: vec![value.id],
            })
            .collect();
        m.selection_group_repo
            .expect_get_all_by_root_item()
            .return_once(move |_| Ok(groups));
        let value_clone = value.clone();
        m.hierarchy_repo
            .expect_get_values_by_ids()
            .times(3)
            .returning(move |_| Ok(vec![value_clone.clone()]));
        m.hierarchy_repo
            .expect_get_field()
            .times(3)
            .returning(move |_| Ok(Some(field.clone())));
        m.task_repo.expect_insert_many().return_once(|tasks: &[ReductionTask]| {
            assert_eq!(tasks.len(), 3);
            for task in tasks {
                assert_eq!(task.selection_criteria.entries.len(), 1);
                assert_eq!(task.selection_criteria.entries[0].field_name, "Region");
                assert_eq!(task.selection_criteria.entries[0].allowed_values, ["EMEA"]);
            }
            Ok(())
        });
        m.reduce_sender.expect_send_object().times(3).returning(|_, _| Ok(()));

        let service = build(m);
        service.publish(item_id, vec![related], Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn static_item_promotes_the_master_directly() {
        let item = RootContentItem {
            id: Uuid::new_v4(),
            name: "pdf handbook".into(),
            kind: ContentKind::Static,
        };
        let item_id = item.id;
        let (_, related) = complete_upload();
        let mut m = mocks(item);
        m.request_repo.expect_claim_processing().return_once(|_| Ok(None));
        m.promote_master_sender
            .expect_send_object()
            .times(1)
            .returning(|_, topic| {
                assert_eq!(topic, "master-promotion");
                Ok(())
            });

        let service = build(m);
        service.publish(item_id, vec![related], Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn publish_needs_a_complete_master_upload() {
        let item_id = Uuid::new_v4();
        let (mut upload, related) = complete_upload();
        upload.status = UploadStatus::Uploading;

        let mut m = mocks(reducible_item());
        let mut root_item_repo = MockRootContentItemRepo::new();
        root_item_repo.expect_get_by_id().return_once(move |_| {
            Ok(Some(RootContentItem {
                id: item_id,
                name: "weekly sales".into(),
                kind: ContentKind::Reducible,
            }))
        });
        m.root_item_repo = root_item_repo;
        let mut upload_repo = MockUploadRepo::new();
        upload_repo.expect_get_by_uid().return_once(move |_| Ok(Some(upload)));
        m.upload_repo = upload_repo;

        let service = build(m);
        let r = service.publish(item_id, vec![related], Uuid::new_v4()).await;
        assert!(matches!(
            r,
            Err(PublicationException::MasterUploadNotComplete { .. })
        ));
    }
}
