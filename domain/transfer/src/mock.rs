use std::path::PathBuf;

use async_trait::async_trait;
use infrastructure_queue::MessageQueueProducerTemplate;
use mockall::mock;

use crate::{
    command::{FinalizeUploadCommand, ScratchOperateCommand, ScratchReadCommand},
    model::{
        entity::{ChunkSet, Upload},
        vo::{HashAlgorithm, UploadUid},
    },
    repository::{ChunkSetRepo, UploadRepo},
    service::{ArtifactStoreService, ScratchService},
};

mock! {
    pub FinalizeSender {}
    #[async_trait]
    impl MessageQueueProducerTemplate<FinalizeUploadCommand> for FinalizeSender {
        async fn send_object(&self, content: &FinalizeUploadCommand, topic: &str) -> anyhow::Result<()>;
    }
}

mock! {
    pub UploadRepo {}
    #[async_trait]
    impl UploadRepo for UploadRepo {
        async fn get_by_uid(&self, uid: &UploadUid) -> anyhow::Result<Option<Upload>>;
        async fn get_complete_by_hash(
            &self,
            hash: &str,
            hash_algorithm: &HashAlgorithm,
        ) -> anyhow::Result<Option<Upload>>;
        async fn insert(&self, upload: &Upload) -> anyhow::Result<()>;
        async fn update(&self, upload: &Upload) -> anyhow::Result<()>;
        async fn remove(&self, uid: &UploadUid) -> anyhow::Result<()>;
    }
}

mock! {
    pub ChunkSetRepo {}
    #[async_trait]
    impl ChunkSetRepo for ChunkSetRepo {
        async fn get(&self, uid: &UploadUid) -> anyhow::Result<Option<ChunkSet>>;
        async fn insert(&self, chunk_set: &ChunkSet) -> anyhow::Result<()>;
        async fn mark_present(&self, uid: &UploadUid, nth: u64) -> anyhow::Result<ChunkSet>;
        async fn remove(&self, uid: &UploadUid) -> anyhow::Result<()>;
    }
}

mock! {
    pub ScratchService {}
    #[async_trait]
    impl ScratchService for ScratchService {
        async fn operate(&self, cmd: ScratchOperateCommand) -> anyhow::Result<()>;
        async fn read(&self, cmd: ScratchReadCommand) -> anyhow::Result<Vec<u8>>;
    }
}

mock! {
    pub ArtifactStoreService {}
    #[async_trait]
    impl ArtifactStoreService for ArtifactStoreService {
        async fn store(&self, hash: &str, content: &[u8]) -> anyhow::Result<PathBuf>;
        async fn exists(&self, hash: &str) -> anyhow::Result<bool>;
        async fn read(&self, hash: &str) -> anyhow::Result<Vec<u8>>;
        fn path_of(&self, hash: &str) -> PathBuf;
    }
}
