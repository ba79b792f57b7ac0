use std::sync::Arc;

use async_trait::async_trait;
use domain_transfer::{
    command::{ScratchOperateCommand, ScratchReadCommand},
    exception::{TransferException, TransferResult},
    model::{
        entity::{Upload, UploadStatus},
        vo::{HashAlgorithm, UploadUid},
    },
    repository::{ChunkSetRepo, UploadRepo},
    service::{ArtifactStoreService, ScratchService, UploadFinalizeService},
};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct UploadFinalizeServiceImpl {
    upload_repo: Arc<dyn UploadRepo>,
    chunk_set_repo: Arc<dyn ChunkSetRepo>,
    scratch_service: Arc<dyn ScratchService>,
    artifact_store: Arc<dyn ArtifactStoreService>,
}

#[async_trait]
impl UploadFinalizeService for UploadFinalizeServiceImpl {
    async fn try_finalize(&self, uid: &UploadUid) -> TransferResult<Upload> {
        let mut upload = self
            .upload_repo
            .get_by_uid(uid)
            .await?
            .ok_or(TransferException::UnknownUpload { uid: uid.clone() })?;

        match upload.status {
            // A second finalize of the same uid is a cheap success.
            UploadStatus::Complete => return Ok(upload),
            UploadStatus::Error => {
                return Err(TransferException::NotAcceptingChunks {
                    uid: uid.clone(),
                    status: upload.status,
                })
            }
            UploadStatus::Uploading | UploadStatus::Verifying => {}
        }

        let chunk_set = self
            .chunk_set_repo
            .get(uid)
            .await?
            .ok_or(TransferException::UnknownUpload { uid: uid.clone() })?;
        let missing = chunk_set.missing(upload.total_chunks);
        if !missing.is_empty() {
            return Err(TransferException::UploadNotComplete {
                uid: uid.clone(),
                missing: missing.len(),
            });
        }

        upload.status = UploadStatus::Verifying;
        self.upload_repo.update(&upload).await?;

        let mut assembled = Vec::with_capacity(upload.total_size as usize);
        for nth in 0..upload.total_chunks {
            let chunk = self
                .scratch_service
                .read(ScratchReadCommand::ReadChunk {
                    uid: uid.clone(),
                    nth,
                })
                .await?;
            assembled.extend(chunk);
        }

        let computed = match upload.hash_algorithm {
            HashAlgorithm::Blake3 => blake3::hash(assembled.as_slice()).to_string().to_uppercase(),
        };
        if computed.ne(&upload.hash) {
            // Assembled bytes are dropped; the scratch chunks stay so the
            // client can re-send exactly the bad ones.
            upload.status = UploadStatus::Error;
            upload.error_message = Some(format!(
                "hash not match, provided: {}, completed: {computed}",
                upload.hash
            ));
            self.upload_repo.update(&upload).await?;
            return Err(TransferException::ChecksumMismatch {
                uid: uid.clone(),
                declared: upload.hash,
                computed,
            });
        }

        if self.artifact_store.exists(&upload.hash).await? {
            tracing::info!(%uid, hash = %upload.hash, "artifact already stored, reusing it");
        } else {
            self.artifact_store.store(&upload.hash, &assembled).await?;
        }

        upload.status = UploadStatus::Complete;
        self.upload_repo.update(&upload).await?;
        self.chunk_set_repo.remove(uid).await?;
        let _ = self
            .scratch_service
            .operate(ScratchOperateCommand::RemoveChunkDir { uid: uid.clone() })
            .await;
        Ok(upload)
    }
}
