//! Bounded internal task queues shared by the portal's background stages.
//!
//! Each pipeline stage owns one named, bounded queue; producers hand
//! serialized payloads to a topic, a fixed-size worker pool drains it.
//! Every instance is constructed and passed in explicitly.

mod background_service;
mod consumer;
mod producer;

#[rustfmt::skip]
pub use {
    background_service::BackgroundService,
    consumer::{ConsumerFn, ConsumerReturn, TaskQueueConsumer},
    producer::{InternalMessage, MessageQueueProducerTemplate, TaskQueue, TaskQueueRouter},
};
