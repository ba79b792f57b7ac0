use std::sync::Arc;

use async_trait::async_trait;
use domain_transfer::{
    command::ScratchOperateCommand,
    exception::{TransferException, TransferResult},
    model::{
        entity::{ChunkSet, Upload, UploadStatus},
        vo::{Chunk, ResumableInfo, UploadUid},
    },
    repository::{ChunkSetRepo, UploadRepo},
    service::{ChunkStoreService, ScratchService},
};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct ChunkStoreServiceImpl {
    upload_repo: Arc<dyn UploadRepo>,
    chunk_set_repo: Arc<dyn ChunkSetRepo>,
    scratch_service: Arc<dyn ScratchService>,
}

impl ChunkStoreServiceImpl {
    /// First chunk of an unknown uid registers the upload.
    ///
    /// When identical bytes were already verified under another name, the
    /// new record is born `Complete` and no transfer happens at all.
    async fn register(&self, info: &ResumableInfo) -> TransferResult<Upload> {
        let mut upload = Upload::from_info(info);
        let flashed = self
            .upload_repo
            .get_complete_by_hash(&upload.hash, &upload.hash_algorithm)
            .await?
            .is_some();
        if flashed {
            tracing::info!(uid = %upload.uid, "identical content already stored, flash completing");
            upload.status = UploadStatus::Complete;
            self.upload_repo.insert(&upload).await?;
            return Ok(upload);
        }
        self.upload_repo.insert(&upload).await?;
        self.chunk_set_repo.insert(&ChunkSet::new(info.uid.clone())).await?;
        Ok(upload)
    }
}

#[async_trait]
impl ChunkStoreService for ChunkStoreServiceImpl {
    async fn write_chunk(
        &self,
        info: &ResumableInfo,
        nth: u64,
        content: Vec<u8>,
    ) -> TransferResult<Vec<u64>> {
        if info.uid != info.derived_uid() {
            return Err(TransferException::ConflictingRegistration {
                uid: info.uid.clone(),
            });
        }
        if let Some(reason) = info.layout_error() {
            return Err(TransferException::InvalidLayout {
                uid: info.uid.clone(),
                reason,
            });
        }
        // Reject bad chunks before any state exists for them.
        if nth >= info.total_chunks {
            return Err(TransferException::ChunkOutOfRange {
                uid: info.uid.clone(),
                nth,
                total_chunks: info.total_chunks,
            });
        }
        let expected = info.expected_chunk_size(nth);
        if content.len() as u64 != expected {
            return Err(TransferException::ChunkSizeMismatch {
                uid: info.uid.clone(),
                nth,
                expected,
                actual: content.len() as u64,
            });
        }

        let upload = match self.upload_repo.get_by_uid(&info.uid).await? {
            Some(existing) => {
                if !existing.matches(info) {
                    return Err(TransferException::ConflictingRegistration {
                        uid: info.uid.clone(),
                    });
                }
                existing
            }
            None => self.register(info).await?,
        };

        match upload.status {
            UploadStatus::Uploading => {}
            // Dedup short-circuit: nothing left to transfer.
            UploadStatus::Complete => return Ok(vec![]),
            status => {
                return Err(TransferException::NotAcceptingChunks {
                    uid: info.uid.clone(),
                    status,
                })
            }
        }

        let chunk_set = self
            .chunk_set_repo
            .get(&info.uid)
            .await?
            .ok_or(TransferException::UnknownUpload {
                uid: info.uid.clone(),
            })?;
        // Client retry after a dropped ack: the chunk is already on disk.
        if chunk_set.present.contains(&nth) {
            return Ok(chunk_set.missing(upload.total_chunks));
        }

        self.scratch_service
            .operate(ScratchOperateCommand::WriteChunk(Chunk {
                uid: info.uid.clone(),
                nth,
                content,
            }))
            .await?;
        let chunk_set = self.chunk_set_repo.mark_present(&info.uid, nth).await?;
        Ok(chunk_set.missing(upload.total_chunks))
    }

    async fn missing_chunks(&self, uid: &UploadUid) -> TransferResult<Vec<u64>> {
        let upload = self
            .upload_repo
            .get_by_uid(uid)
            .await?
            .ok_or(TransferException::UnknownUpload { uid: uid.clone() })?;
        if upload.status == UploadStatus::Complete {
            return Ok(vec![]);
        }
        let chunk_set = self
            .chunk_set_repo
            .get(uid)
            .await?
            .ok_or(TransferException::UnknownUpload { uid: uid.clone() })?;
        Ok(chunk_set.missing(upload.total_chunks))
    }

    async fn upload_status(&self, uid: &UploadUid) -> TransferResult<Upload> {
        Ok(self
            .upload_repo
            .get_by_uid(uid)
            .await?
            .ok_or(TransferException::UnknownUpload { uid: uid.clone() })?)
    }

    async fn cancel(&self, uid: &UploadUid) -> TransferResult<()> {
        let mut upload = self
            .upload_repo
            .get_by_uid(uid)
            .await?
            .ok_or(TransferException::UnknownUpload { uid: uid.clone() })?;
        // Finalized content is no longer cancellable.
        if upload.status == UploadStatus::Complete {
            return Ok(());
        }
        upload.status = UploadStatus::Error;
        upload.error_message = Some("Cancelled by client.".to_string());
        self.upload_repo.update(&upload).await?;
        self.chunk_set_repo.remove(uid).await?;
        let _ = self
            .scratch_service
            .operate(ScratchOperateCommand::RemoveChunkDir { uid: uid.clone() })
            .await;
        Ok(())
    }
}
