use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A filterable dimension of a root content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyField {
    pub id: Uuid,
    pub root_content_item_id: Uuid,
    pub name: String,
}

/// One permitted value of a hierarchy field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyFieldValue {
    pub id: Uuid,
    pub field_id: Uuid,
    pub value: String,
}
