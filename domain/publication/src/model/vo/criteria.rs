use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable filter snapshot a reduction task runs under.
///
/// Conjunction across fields, membership within a field: a record is
/// retained iff, for every criterion, its value for that field is one of
/// the allowed values. A field with no criterion imposes no restriction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionCriteria {
    pub entries: Vec<SelectionCriterion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionCriterion {
    pub field_id: Uuid,
    /// Field name as it appears in master artifact records.
    pub field_name: String,
    pub allowed_values: Vec<String>,
}

impl SelectionCriterion {
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values.iter().any(|v| v == value)
    }
}

impl SelectionCriteria {
    pub fn is_unrestricted(&self) -> bool {
        self.entries.is_empty()
    }
}
