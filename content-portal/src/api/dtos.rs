use actix_easy_multipart::{tempfile::Tempfile, text::Text, MultipartForm};
use domain_publication::model::vo::{RelatedFile, RelatedFileKind};
use domain_transfer::model::vo::{HashAlgorithm, ResumableInfo, UploadUid};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub enum FileHashAlgorithm {
    Blake3,
}

impl From<HashAlgorithm> for FileHashAlgorithm {
    fn from(value: HashAlgorithm) -> Self {
        match value {
            HashAlgorithm::Blake3 => Self::Blake3,
        }
    }
}
impl From<FileHashAlgorithm> for HashAlgorithm {
    fn from(value: FileHashAlgorithm) -> Self {
        match value {
            FileHashAlgorithm::Blake3 => Self::Blake3,
        }
    }
}

/// Wire form of `ResumableInfo`; a missing uid is derived server-side.
#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResumableInfoDto {
    pub uid: Option<String>,
    pub file_name: String,
    pub checksum: String,
    pub hash_algorithm: FileHashAlgorithm,
    pub total_size: u64,
    pub chunk_size: u64,
    pub total_chunks: u64,
}

impl ResumableInfoDto {
    pub fn into_info(self) -> ResumableInfo {
        let uid = self
            .uid
            .map(UploadUid::from)
            .unwrap_or_else(|| UploadUid::derive(&self.file_name, &self.checksum));
        ResumableInfo {
            uid,
            file_name: self.file_name,
            checksum: self.checksum,
            hash_algorithm: self.hash_algorithm.into(),
            total_size: self.total_size,
            chunk_size: self.chunk_size,
            total_chunks: self.total_chunks,
        }
    }
}

#[derive(MultipartForm)]
pub struct ChunkUploadRequest {
    pub file_name: Text<String>,
    pub checksum: Text<String>,
    pub total_size: Text<u64>,
    pub chunk_size: Text<u64>,
    pub total_chunks: Text<u64>,
    pub chunk_number: Text<u64>,
    pub bin: Vec<Tempfile>,
}

impl ChunkUploadRequest {
    pub fn info(&self) -> ResumableInfo {
        let checksum = self.checksum.0.clone();
        ResumableInfo {
            uid: UploadUid::derive(&self.file_name.0, &checksum),
            file_name: self.file_name.0.clone(),
            checksum,
            hash_algorithm: HashAlgorithm::Blake3,
            total_size: self.total_size.0,
            chunk_size: self.chunk_size.0,
            total_chunks: self.total_chunks.0,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatusResponse {
    pub uid: UploadUid,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub root_content_item_id: Uuid,
    pub related_files: Vec<RelatedFileDto>,
}

#[derive(Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RelatedFileDto {
    pub upload_uid: String,
    pub file_name: String,
    pub kind: RelatedFileKindDto,
}

#[derive(Deserialize, Serialize, Clone, Copy)]
pub enum RelatedFileKindDto {
    Master,
    Auxiliary,
}

impl From<RelatedFileDto> for RelatedFile {
    fn from(dto: RelatedFileDto) -> Self {
        RelatedFile {
            upload_uid: UploadUid::from(dto.upload_uid),
            file_name: dto.file_name,
            kind: match dto.kind {
                RelatedFileKindDto::Master => RelatedFileKind::Master,
                RelatedFileKindDto::Auxiliary => RelatedFileKind::Auxiliary,
            },
        }
    }
}
