mod publication;
mod reduction;

pub use publication::PublicationScheduleServiceImpl;
pub use reduction::ReductionScheduleServiceImpl;
