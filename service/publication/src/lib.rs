mod post_process;
mod promotion;
mod publication;
mod reduction;
mod runner;
mod schedule;

#[rustfmt::skip]
pub use {
    post_process::PostProcessServiceImpl,
    promotion::{GoLivePromotionServiceImpl, LocalServingPathResolver},
    publication::PublicationServiceImpl,
    reduction::JsonlReductionEngine,
    runner::{MasterPromoteRunner, ReductionRunner},
    schedule::{PublicationScheduleServiceImpl, ReductionScheduleServiceImpl},
};
