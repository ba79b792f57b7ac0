use std::io::Read;

use actix_easy_multipart::MultipartForm;
use actix_web::web::Path;
use actix_web::{get, post, web, HttpRequest};
use domain_transfer::{command::FinalizeUploadCommand, model::vo::UploadUid};
use infrastructure_queue::MessageQueueProducerTemplate;

use super::dtos::{ChunkUploadRequest, ResumableInfoDto, UploadStatusResponse};
use super::{user_id, ApiError};
use crate::infrastructure::ServiceProvider;

#[post("content-transfer/UploadChunk")]
pub async fn upload_chunk(
    sp: web::Data<ServiceProvider>,
    raw_req: HttpRequest,
    data: MultipartForm<ChunkUploadRequest>,
) -> Result<web::Json<Vec<u64>>, ApiError> {
    let data = data.into_inner();
    let info = data.info();

    let user = user_id(&raw_req)?;
    if !sp.access_control.can_perform(user, "upload", info.uid.as_str()).await? {
        return Err(ApiError::Forbidden {
            user_id: user,
            action: "upload".to_string(),
        });
    }

    if data.bin.len() > 1 {
        return Err(ApiError::InvalidRequest {
            error_description: "Can't upload more than one chunk per request.".to_string(),
        });
    }
    let content = data.bin.first().ok_or(ApiError::InvalidRequest {
        error_description: "Chunk is empty.".to_string(),
    })?;
    let mut bytes = Vec::with_capacity(content.size);
    let mut file = content.file.as_file();
    file.read_to_end(&mut bytes).map_err(|e| ApiError::InvalidRequest {
        error_description: format!("Can't read chunk body: {e}"),
    })?;

    let missing = sp.chunk_store.write_chunk(&info, data.chunk_number.0, bytes).await?;
    Ok(web::Json(missing))
}

#[get("content-transfer/ChunkStatus/{uid}")]
pub async fn chunk_status(
    sp: web::Data<ServiceProvider>,
    uid: Path<String>,
) -> Result<web::Json<Vec<u64>>, ApiError> {
    let uid = UploadUid::from(uid.into_inner());
    Ok(web::Json(sp.chunk_store.missing_chunks(&uid).await?))
}

/// Asynchronous: enqueues verification and returns the pollable uid.
#[post("content-transfer/FinalizeUpload")]
pub async fn finalize_upload(
    sp: web::Data<ServiceProvider>,
    raw_req: HttpRequest,
    data: web::Json<ResumableInfoDto>,
) -> Result<web::Json<UploadUid>, ApiError> {
    let info = data.into_inner().into_info();
    let user = user_id(&raw_req)?;
    if !sp.access_control.can_perform(user, "upload", info.uid.as_str()).await? {
        return Err(ApiError::Forbidden {
            user_id: user,
            action: "upload".to_string(),
        });
    }

    sp.queue_router
        .send_object(
            &FinalizeUploadCommand {
                uid: info.uid.clone(),
            },
            &sp.config.internal_topics.finalize,
        )
        .await?;
    Ok(web::Json(info.uid))
}

#[get("content-transfer/UploadStatus/{uid}")]
pub async fn upload_status(
    sp: web::Data<ServiceProvider>,
    uid: Path<String>,
) -> Result<web::Json<UploadStatusResponse>, ApiError> {
    let uid = UploadUid::from(uid.into_inner());
    let upload = sp.chunk_store.upload_status(&uid).await?;
    Ok(web::Json(UploadStatusResponse {
        uid: upload.uid,
        status: upload.status.to_string(),
        message: upload.error_message,
    }))
}

#[post("content-transfer/CancelUpload")]
pub async fn cancel_upload(
    sp: web::Data<ServiceProvider>,
    raw_req: HttpRequest,
    data: web::Json<ResumableInfoDto>,
) -> Result<web::Json<()>, ApiError> {
    let info = data.into_inner().into_info();
    let user = user_id(&raw_req)?;
    if !sp.access_control.can_perform(user, "upload", info.uid.as_str()).await? {
        return Err(ApiError::Forbidden {
            user_id: user,
            action: "upload".to_string(),
        });
    }
    sp.chunk_store.cancel(&info.uid).await?;
    Ok(web::Json(()))
}
