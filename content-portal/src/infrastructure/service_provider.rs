use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use domain_publication::{
    model::vo::msg::{PublicationChangeInfo, ReductionChangeInfo},
    repository::{
        AuditRecordRepo, HierarchyRepo, PublicationRequestRepo, ReductionTaskRepo,
        RootContentItemRepo, SelectionGroupRepo,
    },
    service::{
        AccessControlService, PostProcessAction, PostProcessService, PublicationService,
        ScheduleService,
    },
};
use domain_transfer::{
    repository::{ChunkSetRepo, UploadRepo},
    service::{ArtifactStoreService, ChunkStoreService, UploadFinalizeService},
};
use infrastructure_queue::{
    BackgroundService, ConsumerFn, TaskQueue, TaskQueueConsumer, TaskQueueRouter,
};
use service_publication::{
    GoLivePromotionServiceImpl, JsonlReductionEngine, LocalServingPathResolver,
    MasterPromoteRunner, PostProcessServiceImpl, PublicationScheduleServiceImpl,
    PublicationServiceImpl, ReductionRunner, ReductionScheduleServiceImpl,
};
use service_transfer::{
    ChunkStoreServiceImpl, LocalArtifactStoreServiceImpl, LocalScratchServiceImpl,
    UploadFinalizeServiceImpl,
};

use super::{
    config::PortalConfig, consumer, repository::*, PermissiveAccessControlService,
    ReportServerRefreshAction,
};

struct StageQueues {
    finalize: TaskQueue,
    reduction: TaskQueue,
    master_promotion: TaskQueue,
    status: TaskQueue,
    post_process: TaskQueue,
}

/// Explicitly constructed dependency graph of the portal; no globals.
pub struct ServiceProvider {
    pub config: PortalConfig,
    pub upload_repo: Arc<dyn UploadRepo>,
    pub chunk_set_repo: Arc<dyn ChunkSetRepo>,
    pub root_item_repo: Arc<dyn RootContentItemRepo>,
    pub selection_group_repo: Arc<dyn SelectionGroupRepo>,
    pub hierarchy_repo: Arc<dyn HierarchyRepo>,
    pub request_repo: Arc<dyn PublicationRequestRepo>,
    pub task_repo: Arc<dyn ReductionTaskRepo>,
    pub audit_repo: Arc<dyn AuditRecordRepo>,
    pub artifact_store: Arc<dyn ArtifactStoreService>,
    pub chunk_store: Arc<dyn ChunkStoreService>,
    pub finalize_service: Arc<dyn UploadFinalizeService>,
    pub publication_service: Arc<dyn PublicationService>,
    pub post_process_service: Arc<dyn PostProcessService>,
    pub publication_schedule: Arc<dyn ScheduleService<Info = PublicationChangeInfo>>,
    pub reduction_schedule: Arc<dyn ScheduleService<Info = ReductionChangeInfo>>,
    pub reduction_runner: Arc<ReductionRunner>,
    pub master_promote_runner: Arc<MasterPromoteRunner>,
    pub access_control: Arc<dyn AccessControlService>,
    pub queue_router: Arc<TaskQueueRouter>,
    queues: StageQueues,
}

impl ServiceProvider {
    pub fn build(config: PortalConfig) -> anyhow::Result<Self> {
        let topics = config.internal_topics.clone();
        let capacity = config.queues.capacity;
        let op_timeout = Duration::from_secs(config.queues.op_timeout_secs);

        let queues = StageQueues {
            finalize: TaskQueue::bounded(&topics.finalize, capacity),
            reduction: TaskQueue::bounded(&topics.reduction, capacity),
            master_promotion: TaskQueue::bounded(&topics.master_promotion, capacity),
            status: TaskQueue::bounded(&topics.status, capacity),
            post_process: TaskQueue::bounded(&topics.post_process, capacity),
        };
        let queue_router = Arc::new(
            TaskQueueRouter::new()
                .register(&queues.finalize)
                .register(&queues.reduction)
                .register(&queues.master_promotion)
                .register(&queues.status)
                .register(&queues.post_process),
        );

        let upload_repo = Arc::new(InMemoryUploadRepo::default());
        let chunk_set_repo = Arc::new(InMemoryChunkSetRepo::default());
        let root_item_repo = Arc::new(InMemoryRootContentItemRepo::default());
        let selection_group_repo = Arc::new(InMemorySelectionGroupRepo::default());
        let hierarchy_repo = Arc::new(InMemoryHierarchyRepo::default());
        let request_repo = Arc::new(InMemoryPublicationRequestRepo::default());
        let task_repo = Arc::new(InMemoryReductionTaskRepo::default());
        let audit_repo = Arc::new(InMemoryAuditRecordRepo::default());

        let scratch_service = Arc::new(
            LocalScratchServiceImpl::builder().base(config.storage.scratch_dir.clone()).build(),
        );
        let artifact_store = Arc::new(
            LocalArtifactStoreServiceImpl::builder()
                .base(config.storage.artifact_dir.clone())
                .build(),
        );
        let chunk_store = Arc::new(
            ChunkStoreServiceImpl::builder()
                .upload_repo(upload_repo.clone())
                .chunk_set_repo(chunk_set_repo.clone())
                .scratch_service(scratch_service.clone())
                .build(),
        );
        let finalize_service = Arc::new(
            UploadFinalizeServiceImpl::builder()
                .upload_repo(upload_repo.clone())
                .chunk_set_repo(chunk_set_repo.clone())
                .scratch_service(scratch_service.clone())
                .artifact_store(artifact_store.clone())
                .build(),
        );

        let serving_paths = Arc::new(
            LocalServingPathResolver::builder()
                .serving_root(config.storage.serving_dir.clone())
                .build(),
        );
        let promotion = Arc::new(GoLivePromotionServiceImpl::builder().build());
        let engine = Arc::new(JsonlReductionEngine);
        let access_control = Arc::new(PermissiveAccessControlService);

        let publication_schedule = Arc::new(
            PublicationScheduleServiceImpl::builder()
                .request_repo(request_repo.clone())
                .post_process_sender(queue_router.clone())
                .post_process_topic(topics.post_process.clone())
                .build(),
        );
        let reduction_schedule = Arc::new(
            ReductionScheduleServiceImpl::builder()
                .task_repo(task_repo.clone())
                .publication_schedule(publication_schedule.clone())
                .build(),
        );

        let publication_service = Arc::new(
            PublicationServiceImpl::builder()
                .root_item_repo(root_item_repo.clone())
                .selection_group_repo(selection_group_repo.clone())
                .hierarchy_repo(hierarchy_repo.clone())
                .request_repo(request_repo.clone())
                .task_repo(task_repo.clone())
                .upload_repo(upload_repo.clone())
                .access_control(access_control.clone())
                .reduce_sender(queue_router.clone())
                .reduce_topic(topics.reduction.clone())
                .promote_master_sender(queue_router.clone())
                .promote_master_topic(topics.master_promotion.clone())
                .build(),
        );

        let reduction_runner = Arc::new(
            ReductionRunner::builder()
                .task_repo(task_repo.clone())
                .request_repo(request_repo.clone())
                .selection_group_repo(selection_group_repo.clone())
                .upload_repo(upload_repo.clone())
                .artifact_store(artifact_store.clone())
                .engine(engine)
                .promotion(promotion.clone())
                .serving_paths(serving_paths.clone())
                .status_sender(queue_router.clone())
                .status_topic(topics.status.clone())
                .reduced_base(config.storage.reduced_dir.clone())
                .op_timeout(op_timeout)
                .build(),
        );
        let master_promote_runner = Arc::new(
            MasterPromoteRunner::builder()
                .request_repo(request_repo.clone())
                .upload_repo(upload_repo.clone())
                .artifact_store(artifact_store.clone())
                .promotion(promotion)
                .serving_paths(serving_paths)
                .status_sender(queue_router.clone())
                .status_topic(topics.status.clone())
                .op_timeout(op_timeout)
                .build(),
        );

        let mut actions: Vec<Arc<dyn PostProcessAction>> = vec![];
        if let Some(url) = &config.post_process.report_server_refresh_url {
            actions.push(Arc::new(
                ReportServerRefreshAction::builder().refresh_url(url.clone()).build(),
            ));
        }
        let post_process_service = Arc::new(
            PostProcessServiceImpl::builder()
                .request_repo(request_repo.clone())
                .audit_repo(audit_repo.clone())
                .actions(actions)
                .build(),
        );

        Ok(Self {
            config,
            upload_repo,
            chunk_set_repo,
            root_item_repo,
            selection_group_repo,
            hierarchy_repo,
            request_repo,
            task_repo,
            audit_repo,
            artifact_store,
            chunk_store,
            finalize_service,
            publication_service,
            post_process_service,
            publication_schedule,
            reduction_schedule,
            reduction_runner,
            master_promote_runner,
            access_control,
            queue_router,
            queues,
        })
    }

    /// One bounded worker-pool consumer per stage queue.
    pub fn background_services(self: Arc<Self>) -> Vec<Arc<dyn BackgroundService>> {
        let workers = &self.config.queues;
        let pool = |queue: &TaskQueue,
                    size: usize,
                    handler: ConsumerFn<ServiceProvider>|
         -> Arc<dyn BackgroundService> {
            let mut fn_mapper: HashMap<String, ConsumerFn<ServiceProvider>> = HashMap::new();
            fn_mapper.insert(queue.name().to_string(), handler);
            Arc::new(TaskQueueConsumer::new(
                queue.receiver(),
                size,
                self.clone(),
                fn_mapper,
            ))
        };
        vec![
            pool(&self.queues.finalize, workers.finalize_workers, consumer::finalize_upload),
            pool(&self.queues.reduction, workers.reduction_workers, consumer::run_reduction),
            pool(
                &self.queues.master_promotion,
                workers.promotion_workers,
                consumer::promote_master,
            ),
            // Status fan-in must observe one change at a time; a single
            // worker keeps the sibling checks race-free.
            pool(&self.queues.status, 1, consumer::status_change),
            pool(
                &self.queues.post_process,
                workers.post_process_workers,
                consumer::post_process,
            ),
        ]
    }
}
