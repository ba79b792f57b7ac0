use actix_http::StatusCode;
use actix_web::HttpResponse;
use domain_publication::exception::PublicationException;
use domain_transfer::exception::TransferException;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transfer(#[from] TransferException),

    #[error(transparent)]
    Publication(#[from] PublicationException),

    #[error("{error_description}")]
    InvalidRequest { error_description: String },

    #[error("User {user_id} may not {action}.")]
    Forbidden { user_id: uuid::Uuid, action: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: String,
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Transfer(e) => match e {
                TransferException::UnknownUpload { .. } => StatusCode::NOT_FOUND,
                TransferException::ChunkOutOfRange { .. }
                | TransferException::ChunkSizeMismatch { .. }
                | TransferException::InvalidLayout { .. }
                | TransferException::NotAcceptingChunks { .. }
                | TransferException::UploadNotComplete { .. }
                | TransferException::ChecksumMismatch { .. } => StatusCode::BAD_REQUEST,
                TransferException::ConflictingRegistration { .. } => StatusCode::CONFLICT,
                TransferException::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Publication(e) => match e {
                PublicationException::ConcurrencyConflict { .. } => StatusCode::CONFLICT,
                PublicationException::RootContentItemNotFound { .. }
                | PublicationException::RequestNotFound { .. }
                | PublicationException::TaskNotFound { .. } => StatusCode::NOT_FOUND,
                PublicationException::MasterFileMissing { .. }
                | PublicationException::MasterUploadUnknown { .. }
                | PublicationException::MasterUploadNotComplete { .. } => StatusCode::BAD_REQUEST,
                PublicationException::Forbidden { .. } => StatusCode::FORBIDDEN,
                PublicationException::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.to_string(),
        })
    }
}
