mod criteria;
pub mod msg;
mod related_file;
mod status_view;

#[rustfmt::skip]
pub use {
    criteria::{SelectionCriteria, SelectionCriterion},
    related_file::{RelatedFile, RelatedFileKind},
    status_view::{PublicationStatusView, SelectionGroupStatusView},
};
