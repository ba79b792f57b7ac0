use anyhow::anyhow;
use async_trait::async_trait;
use domain_transfer::{
    command::{ScratchOperateCommand, ScratchReadCommand},
    model::vo::UploadUid,
    service::ScratchService,
};
use std::path::{Path, PathBuf};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder, Clone)]
pub struct LocalScratchServiceImpl {
    #[builder(default = "scratch_dir".into(), setter(into))]
    base: PathBuf,
}

impl LocalScratchServiceImpl {
    fn chunk_path(&self, uid: &UploadUid, nth: u64) -> PathBuf {
        self.base.join(format!("chunks/{uid}/{nth}"))
    }

    fn chunk_dir(&self, uid: &UploadUid) -> PathBuf {
        self.base.join(format!("chunks/{uid}"))
    }
}

async fn create_parent_and_write(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&path.parent().ok_or(anyhow!("path: {path:?} doesn't has parent."))?)
        .await?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

#[async_trait]
impl ScratchService for LocalScratchServiceImpl {
    async fn operate(&self, cmd: ScratchOperateCommand) -> anyhow::Result<()> {
        use ScratchOperateCommand::*;
        match cmd {
            WriteChunk(chunk) => {
                let path = self.chunk_path(&chunk.uid, chunk.nth);
                create_parent_and_write(&path, &chunk.content).await?;
            }
            RemoveChunkDir { uid } => {
                let dir = self.chunk_dir(&uid);
                tokio::fs::remove_dir_all(dir).await?;
            }
        };
        Ok(())
    }

    async fn read(&self, cmd: ScratchReadCommand) -> anyhow::Result<Vec<u8>> {
        use ScratchReadCommand::*;
        Ok(match cmd {
            ReadChunk { uid, nth } => {
                let path = self.chunk_path(&uid, nth);
                tokio::fs::read(path).await?
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use domain_transfer::model::vo::Chunk;

    use super::*;
    use ScratchOperateCommand::*;
    use ScratchReadCommand::*;

    fn load() -> LocalScratchServiceImpl {
        LocalScratchServiceImpl::builder().build()
    }

    fn uid() -> UploadUid {
        UploadUid::derive(&uuid::Uuid::new_v4().to_string(), "AB")
    }

    #[tokio::test]
    async fn write_chunk_overwrites_in_place() {
        let service = load();
        let uid = uid();

        let cmd0 = WriteChunk(Chunk {
            uid: uid.clone(),
            content: b"123".to_vec(),
            nth: 0,
        });
        let cmd1 = WriteChunk(Chunk {
            uid: uid.clone(),
            content: b"456".to_vec(),
            nth: 0,
        });
        service.operate(cmd0).await.unwrap();
        service.operate(cmd1).await.unwrap();
        let content = service
            .read(ReadChunk {
                uid: uid.clone(),
                nth: 0,
            })
            .await
            .unwrap();
        assert_eq!(b"456", content.as_slice());
        service.operate(RemoveChunkDir { uid }).await.unwrap();
    }

    #[tokio::test]
    async fn chunks_of_one_upload_share_a_dir() {
        let service = load();
        let uid = uid();
        for nth in 0..3 {
            service
                .operate(WriteChunk(Chunk {
                    uid: uid.clone(),
                    content: vec![nth as u8],
                    nth,
                }))
                .await
                .unwrap();
        }
        service.operate(RemoveChunkDir { uid: uid.clone() }).await.unwrap();
        assert!(service.read(ReadChunk { uid, nth: 0 }).await.is_err());
    }
}
