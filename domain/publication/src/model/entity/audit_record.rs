use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one post-processing action, kept for operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub publication_request_id: Uuid,
    pub action: String,
    pub succeeded: bool,
    pub message: Option<String>,
    pub created_at_utc: DateTime<Utc>,
}
