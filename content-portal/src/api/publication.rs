use actix_web::web::Path;
use actix_web::{get, post, web, HttpRequest};
use domain_publication::model::vo::PublicationStatusView;
use uuid::Uuid;

use super::dtos::PublishRequest;
use super::{user_id, ApiError};
use crate::infrastructure::ServiceProvider;

/// Synchronous gate into the pipeline: a conflicting publish is rejected
/// here with 409 so the publisher can retry later.
#[post("publication/Publish")]
pub async fn publish(
    sp: web::Data<ServiceProvider>,
    raw_req: HttpRequest,
    data: web::Json<PublishRequest>,
) -> Result<web::Json<Uuid>, ApiError> {
    let user = user_id(&raw_req)?;
    let data = data.into_inner();
    let related_files = data.related_files.into_iter().map(Into::into).collect();
    let request_id = sp
        .publication_service
        .publish(data.root_content_item_id, related_files, user)
        .await?;
    Ok(web::Json(request_id))
}

#[get("publication/Status/{id}")]
pub async fn publication_status(
    sp: web::Data<ServiceProvider>,
    id: Path<Uuid>,
) -> Result<web::Json<PublicationStatusView>, ApiError> {
    let view = sp.publication_service.status_view(id.into_inner()).await?;
    Ok(web::Json(view))
}
