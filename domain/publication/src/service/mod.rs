mod access;
mod post_process;
mod promotion;
mod publication;
mod reduction;
mod schedule;

#[rustfmt::skip]
pub use {
    access::AccessControlService,
    post_process::{PostProcessAction, PostProcessService},
    promotion::{PromotionService, ServingPathResolver},
    publication::PublicationService,
    reduction::ReductionEngine,
    schedule::ScheduleService,
};
