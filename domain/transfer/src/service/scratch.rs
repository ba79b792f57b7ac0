use async_trait::async_trait;

use crate::command::*;

/// # Scratch storage service
///
/// Holds the chunks of unfinished transfers under a base path, keyed by
/// upload uid. Scratch data is reclaimed after finalization or cancel.
#[async_trait]
pub trait ScratchService: Send + Sync {
    async fn operate(&self, cmd: ScratchOperateCommand) -> anyhow::Result<()>;
    async fn read(&self, cmd: ScratchReadCommand) -> anyhow::Result<Vec<u8>>;
}
