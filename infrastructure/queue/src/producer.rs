use std::collections::HashMap;

use async_trait::async_trait;

/// A serialized payload addressed to one stage topic.
#[derive(Debug, Clone)]
pub struct InternalMessage {
    pub target: String,
    pub body: String,
}

/// Typed producer over the internal queues.
#[async_trait]
pub trait MessageQueueProducerTemplate<T>: Send + Sync {
    async fn send_object(&self, content: &T, topic: &str) -> anyhow::Result<()>;
}

/// One stage's bounded queue.
///
/// Capacity is the backpressure knob: a full queue makes `send_object` wait
/// instead of fanning out without limit.
pub struct TaskQueue {
    name: String,
    sender: flume::Sender<InternalMessage>,
    receiver: flume::Receiver<InternalMessage>,
}

impl TaskQueue {
    pub fn bounded(name: &str, capacity: usize) -> Self {
        let (sender, receiver) = flume::bounded(capacity);
        Self {
            name: name.to_string(),
            sender,
            receiver,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sender(&self) -> flume::Sender<InternalMessage> {
        self.sender.clone()
    }

    pub fn receiver(&self) -> flume::Receiver<InternalMessage> {
        self.receiver.clone()
    }
}

/// Routes typed sends onto the topic's queue.
#[derive(Default)]
pub struct TaskQueueRouter {
    routes: HashMap<String, flume::Sender<InternalMessage>>,
}

impl TaskQueueRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, queue: &TaskQueue) -> Self {
        self.routes.insert(queue.name().to_string(), queue.sender());
        self
    }
}

#[async_trait]
impl<T> MessageQueueProducerTemplate<T> for TaskQueueRouter
where
    T: serde::Serialize + Send + Sync,
{
    async fn send_object(&self, content: &T, topic: &str) -> anyhow::Result<()> {
        let sender = self
            .routes
            .get(topic)
            .ok_or_else(|| anyhow::anyhow!("No queue registered for topic: {topic}"))?;
        sender
            .send_async(InternalMessage {
                target: topic.to_string(),
                body: serde_json::to_string(content)?,
            })
            .await?;
        Ok(())
    }
}
