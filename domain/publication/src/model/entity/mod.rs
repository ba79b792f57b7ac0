mod audit_record;
mod hierarchy;
mod publication_request;
mod reduction_task;
mod root_content_item;
mod selection_group;

#[rustfmt::skip]
pub use {
    audit_record::AuditRecord,
    hierarchy::{HierarchyField, HierarchyFieldValue},
    publication_request::{PublicationRequest, PublicationStatus},
    reduction_task::{ReductionTask, ReductionTaskStatus},
    root_content_item::{ContentKind, RootContentItem},
    selection_group::SelectionGroup,
};
