mod audit;
mod hierarchy;
mod publication_request;
mod reduction_task;
mod root_content_item;
mod selection_group;

#[rustfmt::skip]
pub use {
    audit::AuditRecordRepo,
    hierarchy::HierarchyRepo,
    publication_request::PublicationRequestRepo,
    reduction_task::ReductionTaskRepo,
    root_content_item::RootContentItemRepo,
    selection_group::SelectionGroupRepo,
};
