use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::vo::{RelatedFile, RelatedFileKind};

/// One publication attempt for a root content item.
///
/// At most one request per item may be `Processing` at a time; terminal
/// records (`Confirmed`/`Failed`) are never mutated again and are kept for
/// audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationRequest {
    pub id: Uuid,
    pub root_content_item_id: Uuid,
    pub requesting_user_id: Uuid,
    pub status: PublicationStatus,
    pub message: Option<String>,
    pub related_files: Vec<RelatedFile>,
    pub created_at_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicationStatus {
    #[default]
    Unknown,
    Processing,
    Confirmed,
    Failed,
}

impl std::fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Processing => write!(f, "Processing"),
            Self::Confirmed => write!(f, "Confirmed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

impl PublicationRequest {
    pub fn master_file(&self) -> Option<&RelatedFile> {
        self.related_files.iter().find(|f| f.kind == RelatedFileKind::Master)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            PublicationStatus::Confirmed | PublicationStatus::Failed
        )
    }
}
