//! Resumable content transfer domain: uploads, chunk sets and the services
//! that drive them from first chunk to a verified, deduplicated artifact.

pub mod command;
pub mod exception;
pub mod model;
pub mod repository;
pub mod service;

#[cfg(feature = "mock")]
pub mod mock;
