mod access;
pub mod config;
pub mod consumer;
pub mod repository;
mod report_server;
mod service_provider;
pub mod telemetry;

#[rustfmt::skip]
pub use {
    access::PermissiveAccessControlService,
    report_server::ReportServerRefreshAction,
    service_provider::ServiceProvider,
};
