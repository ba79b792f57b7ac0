use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level published content entity: one report family with a master
/// artifact and, for reducible kinds, one derived artifact per audience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootContentItem {
    pub id: Uuid,
    pub name: String,
    pub kind: ContentKind,
}

/// Whether the content type supports audience-specific variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    /// The master artifact is reduced once per selection group.
    Reducible,
    /// The master artifact itself goes live, unreduced.
    Static,
}
