use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An audience view of a root content item, keyed by a set of hierarchy
/// field value selections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionGroup {
    pub id: Uuid,
    pub root_content_item_id: Uuid,
    pub group_name: String,
    /// Url end users open this group's artifact under.
    pub content_instance_url: String,
    pub selected_hierarchy_field_value_ids: Vec<Uuid>,
}
