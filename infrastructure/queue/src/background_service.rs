use async_trait::async_trait;

/// A long-running loop spawned at host startup and aborted at shutdown.
#[async_trait]
pub trait BackgroundService: Send + Sync {
    async fn run(&self);
}
