use std::path::{Path, PathBuf};

use async_trait::async_trait;
use infrastructure_queue::MessageQueueProducerTemplate;
use mockall::mock;
use uuid::Uuid;

use crate::{
    command::{PostProcessCommand, PromoteMasterCommand, RunReductionCommand},
    exception::{PromotionResult, ReductionResult},
    model::{
        entity::{
            AuditRecord, HierarchyField, HierarchyFieldValue, PublicationRequest, ReductionTask,
            RootContentItem, SelectionGroup,
        },
        vo::{msg::ChangeMsg, SelectionCriteria},
    },
    repository::{
        AuditRecordRepo, HierarchyRepo, PublicationRequestRepo, ReductionTaskRepo,
        RootContentItemRepo, SelectionGroupRepo,
    },
    service::{
        AccessControlService, PostProcessAction, PromotionService, ReductionEngine,
        ServingPathResolver,
    },
};

mock! {
    pub StatusSender {}
    #[async_trait]
    impl MessageQueueProducerTemplate<ChangeMsg> for StatusSender {
        async fn send_object(&self, content: &ChangeMsg, topic: &str) -> anyhow::Result<()>;
    }
}

mock! {
    pub ReductionSender {}
    #[async_trait]
    impl MessageQueueProducerTemplate<RunReductionCommand> for ReductionSender {
        async fn send_object(&self, content: &RunReductionCommand, topic: &str) -> anyhow::Result<()>;
    }
}

mock! {
    pub PromoteMasterSender {}
    #[async_trait]
    impl MessageQueueProducerTemplate<PromoteMasterCommand> for PromoteMasterSender {
        async fn send_object(&self, content: &PromoteMasterCommand, topic: &str) -> anyhow::Result<()>;
    }
}

mock! {
    pub PostProcessSender {}
    #[async_trait]
    impl MessageQueueProducerTemplate<PostProcessCommand> for PostProcessSender {
        async fn send_object(&self, content: &PostProcessCommand, topic: &str) -> anyhow::Result<()>;
    }
}

mock! {
    pub RootContentItemRepo {}
    #[async_trait]
    impl RootContentItemRepo for RootContentItemRepo {
        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<RootContentItem>>;
        async fn insert(&self, item: &RootContentItem) -> anyhow::Result<()>;
    }
}

mock! {
    pub SelectionGroupRepo {}
    #[async_trait]
    impl SelectionGroupRepo for SelectionGroupRepo {
        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<SelectionGroup>>;
        async fn get_all_by_root_item(
            &self,
            root_content_item_id: Uuid,
        ) -> anyhow::Result<Vec<SelectionGroup>>;
        async fn insert(&self, group: &SelectionGroup) -> anyhow::Result<()>;
    }
}

mock! {
    pub HierarchyRepo {}
    #[async_trait]
    impl HierarchyRepo for HierarchyRepo {
        async fn get_field(&self, field_id: Uuid) -> anyhow::Result<Option<HierarchyField>>;
        async fn get_values_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<HierarchyFieldValue>>;
        async fn insert_field(&self, field: &HierarchyField) -> anyhow::Result<()>;
        async fn insert_value(&self, value: &HierarchyFieldValue) -> anyhow::Result<()>;
    }
}

mock! {
    pub PublicationRequestRepo {}
    #[async_trait]
    impl PublicationRequestRepo for PublicationRequestRepo {
        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<PublicationRequest>>;
        async fn claim_processing(
            &self,
            request: &PublicationRequest,
        ) -> anyhow::Result<Option<Uuid>>;
        async fn release_processing(
            &self,
            root_content_item_id: Uuid,
            request_id: Uuid,
        ) -> anyhow::Result<()>;
        async fn update(&self, request: &PublicationRequest) -> anyhow::Result<()>;
    }
}

mock! {
    pub ReductionTaskRepo {}
    #[async_trait]
    impl ReductionTaskRepo for ReductionTaskRepo {
        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<ReductionTask>>;
        async fn get_by_request(
            &self,
            publication_request_id: Uuid,
        ) -> anyhow::Result<Vec<ReductionTask>>;
        async fn insert_many(&self, tasks: &[ReductionTask]) -> anyhow::Result<()>;
        async fn update(&self, task: &ReductionTask) -> anyhow::Result<()>;
    }
}

mock! {
    pub AuditRecordRepo {}
    #[async_trait]
    impl AuditRecordRepo for AuditRecordRepo {
        async fn insert(&self, record: &AuditRecord) -> anyhow::Result<()>;
        async fn get_by_request(
            &self,
            publication_request_id: Uuid,
        ) -> anyhow::Result<Vec<AuditRecord>>;
    }
}

mock! {
    pub ReductionEngine {}
    #[async_trait]
    impl ReductionEngine for ReductionEngine {
        async fn reduce(
            &self,
            master: &Path,
            criteria: &SelectionCriteria,
            output: &Path,
        ) -> ReductionResult<()>;
    }
}

mock! {
    pub PromotionService {}
    #[async_trait]
    impl PromotionService for PromotionService {
        async fn promote(&self, target: &Path, new_artifact: &Path) -> PromotionResult<()>;
    }
}

mock! {
    pub ServingPathResolver {}
    impl ServingPathResolver for ServingPathResolver {
        fn master_path(&self, root_content_item_id: Uuid) -> PathBuf;
        fn group_path(&self, root_content_item_id: Uuid, selection_group_id: Uuid) -> PathBuf;
    }
}

mock! {
    pub AccessControlService {}
    #[async_trait]
    impl AccessControlService for AccessControlService {
        async fn can_perform(
            &self,
            user_id: Uuid,
            action: &str,
            resource: &str,
        ) -> anyhow::Result<bool>;
    }
}

mock! {
    pub PostProcessAction {}
    #[async_trait]
    impl PostProcessAction for PostProcessAction {
        fn name(&self) -> &str;
        async fn execute(&self, request: &PublicationRequest) -> anyhow::Result<()>;
    }
}
