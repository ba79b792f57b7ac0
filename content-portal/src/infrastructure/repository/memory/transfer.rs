use anyhow::anyhow;
use async_trait::async_trait;
use dashmap::DashMap;
use domain_transfer::{
    model::{
        entity::{ChunkSet, Upload, UploadStatus},
        vo::{HashAlgorithm, UploadUid},
    },
    repository::{ChunkSetRepo, UploadRepo},
};

#[derive(Default)]
pub struct InMemoryUploadRepo {
    uploads: DashMap<UploadUid, Upload>,
}

#[async_trait]
impl UploadRepo for InMemoryUploadRepo {
    async fn get_by_uid(&self, uid: &UploadUid) -> anyhow::Result<Option<Upload>> {
        Ok(self.uploads.get(uid).map(|u| u.clone()))
    }

    async fn get_complete_by_hash(
        &self,
        hash: &str,
        hash_algorithm: &HashAlgorithm,
    ) -> anyhow::Result<Option<Upload>> {
        Ok(self
            .uploads
            .iter()
            .find(|u| {
                u.status == UploadStatus::Complete
                    && u.hash == hash
                    && u.hash_algorithm == *hash_algorithm
            })
            .map(|u| u.clone()))
    }

    async fn insert(&self, upload: &Upload) -> anyhow::Result<()> {
        self.uploads.insert(upload.uid.clone(), upload.clone());
        Ok(())
    }

    async fn update(&self, upload: &Upload) -> anyhow::Result<()> {
        self.uploads.insert(upload.uid.clone(), upload.clone());
        Ok(())
    }

    async fn remove(&self, uid: &UploadUid) -> anyhow::Result<()> {
        self.uploads.remove(uid);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryChunkSetRepo {
    sets: DashMap<UploadUid, ChunkSet>,
}

#[async_trait]
impl ChunkSetRepo for InMemoryChunkSetRepo {
    async fn get(&self, uid: &UploadUid) -> anyhow::Result<Option<ChunkSet>> {
        Ok(self.sets.get(uid).map(|s| s.clone()))
    }

    async fn insert(&self, chunk_set: &ChunkSet) -> anyhow::Result<()> {
        self.sets.insert(chunk_set.upload_uid.clone(), chunk_set.clone());
        Ok(())
    }

    async fn mark_present(&self, uid: &UploadUid, nth: u64) -> anyhow::Result<ChunkSet> {
        // The map entry is locked for the whole mutation, so concurrent
        // writers of distinct chunks never lose each other's marks.
        let mut set = self
            .sets
            .get_mut(uid)
            .ok_or(anyhow!("No chunk set for upload: {uid}"))?;
        set.present.insert(nth);
        Ok(set.clone())
    }

    async fn remove(&self, uid: &UploadUid) -> anyhow::Result<()> {
        self.sets.remove(uid);
        Ok(())
    }
}
