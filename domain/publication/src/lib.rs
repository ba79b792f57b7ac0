//! Content publication domain: publication requests, audience selection
//! groups, reduction tasks and the go-live pipeline around them.

pub mod command;
pub mod exception;
pub mod model;
pub mod repository;
pub mod service;

#[cfg(feature = "mock")]
pub mod mock;
