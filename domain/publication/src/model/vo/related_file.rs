use domain_transfer::model::vo::UploadUid;
use serde::{Deserialize, Serialize};

/// A finalized upload attached to a publication request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedFile {
    pub upload_uid: UploadUid,
    pub file_name: String,
    pub kind: RelatedFileKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelatedFileKind {
    /// The artifact the pipeline publishes (and reduces, if the item does).
    Master,
    /// Carried alongside for audit; not promoted.
    Auxiliary,
}
