use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use async_trait::async_trait;
use tracing::Instrument;

use crate::{background_service::BackgroundService, producer::InternalMessage};

pub type ConsumerReturn<'async_fn> =
    Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'async_fn>>;
pub type ConsumerFn<SP> =
    for<'async_fn> fn(content: &'async_fn str, sp: Arc<SP>) -> ConsumerReturn<'async_fn>;

/// Fixed-size worker pool draining one stage queue.
///
/// Workers share the flume receiver; a message is handled by exactly one
/// worker. Handler errors are logged, never propagated: terminal outcomes
/// are written to the catalog by the handlers themselves and observed by
/// polling.
pub struct TaskQueueConsumer<SP>
where
    SP: Send + Sync + 'static,
{
    receiver: flume::Receiver<InternalMessage>,
    workers: usize,
    service_provider: Arc<SP>,
    fn_mapper: Arc<HashMap<String, ConsumerFn<SP>>>,
}

impl<SP> TaskQueueConsumer<SP>
where
    SP: Send + Sync + 'static,
{
    pub fn new(
        receiver: flume::Receiver<InternalMessage>,
        workers: usize,
        service_provider: Arc<SP>,
        fn_mapper: HashMap<String, ConsumerFn<SP>>,
    ) -> Self {
        Self {
            receiver,
            workers: workers.max(1),
            service_provider,
            fn_mapper: Arc::new(fn_mapper),
        }
    }
}

#[async_trait]
impl<SP> BackgroundService for TaskQueueConsumer<SP>
where
    SP: Send + Sync + 'static,
{
    async fn run(&self) {
        let mut handles = Vec::with_capacity(self.workers);
        for worker in 0..self.workers {
            let receiver = self.receiver.clone();
            let sp = self.service_provider.clone();
            let fn_mapper = self.fn_mapper.clone();
            handles.push(tokio::spawn(async move {
                while let Ok(message) = receiver.recv_async().await {
                    tracing::trace!(worker, target = %message.target, "message received");
                    match fn_mapper.get(message.target.as_str()) {
                        Some(handler) => {
                            if let Err(e) = handler(message.body.as_str(), sp.clone())
                                .instrument(tracing::info_span!(
                                    "task_queue",
                                    topic = %message.target,
                                    worker
                                ))
                                .await
                            {
                                tracing::error!(topic = %message.target, "{e}");
                            }
                        }
                        None => tracing::warn!("No such handler: {}.", message.target),
                    }
                }
            }));
        }
        futures::future::join_all(handles).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::producer::{MessageQueueProducerTemplate, TaskQueue, TaskQueueRouter};

    #[derive(Default)]
    struct Counter {
        seen: AtomicUsize,
    }

    fn handle(content: &str, sp: Arc<Counter>) -> ConsumerReturn<'_> {
        Box::pin(async move {
            let n: usize = serde_json::from_str(content)?;
            sp.seen.fetch_add(n, Ordering::SeqCst);
            Ok(())
        })
    }

    #[tokio::test]
    async fn every_message_is_handled_exactly_once_across_the_pool() {
        let queue = TaskQueue::bounded("adds", 8);
        let router = TaskQueueRouter::new().register(&queue);
        let counter = Arc::new(Counter::default());
        let mut fn_mapper: HashMap<String, ConsumerFn<Counter>> = HashMap::new();
        fn_mapper.insert("adds".to_string(), handle);
        let consumer = Arc::new(TaskQueueConsumer::new(
            queue.receiver(),
            3,
            counter.clone(),
            fn_mapper,
        ));
        let spawned = consumer.clone();
        tokio::spawn(async move { spawned.run().await });

        for n in 1..=10usize {
            router.send_object(&n, "adds").await.unwrap();
        }
        tokio::time::timeout(Duration::from_secs(5), async {
            while counter.seen.load(Ordering::SeqCst) != 55 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn unregistered_topics_are_rejected_at_send() {
        let router = TaskQueueRouter::new();
        assert!(router.send_object(&1usize, "nowhere").await.is_err());
    }
}
