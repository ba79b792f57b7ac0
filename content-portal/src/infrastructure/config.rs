use std::path::PathBuf;

use serde::Deserialize;

#[derive(Default, Clone, Deserialize, Debug)]
pub struct PortalConfig {
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub queues: QueueConfig,
    #[serde(default)]
    pub post_process: PostProcessConfig,
    #[serde(default)]
    pub internal_topics: InternalTopics,
}

/// Layered load: optional `config.yaml` next to the binary, overridden by
/// `PORTAL__`-prefixed environment variables.
pub fn build_config() -> anyhow::Result<PortalConfig> {
    let config = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("PORTAL").separator("__"))
        .build()?;
    Ok(config.try_deserialize()?)
}

#[derive(Clone, Deserialize, Debug)]
pub struct HostConfig {
    #[serde(default = "HostConfig::default_bind_address")]
    pub bind_address: String,
    #[serde(default = "HostConfig::default_port")]
    pub port: u16,
    /// Upper bound of one chunk-upload form.
    #[serde(default = "HostConfig::default_upload_form_limit")]
    pub upload_form_limit: usize,
}

impl HostConfig {
    fn default_bind_address() -> String {
        "127.0.0.1".to_string()
    }
    fn default_port() -> u16 {
        8060
    }
    fn default_upload_form_limit() -> usize {
        100 * 1024 * 1024
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bind_address: Self::default_bind_address(),
            port: Self::default_port(),
            upload_form_limit: Self::default_upload_form_limit(),
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_scratch_dir")]
    pub scratch_dir: PathBuf,
    #[serde(default = "StorageConfig::default_artifact_dir")]
    pub artifact_dir: PathBuf,
    #[serde(default = "StorageConfig::default_reduced_dir")]
    pub reduced_dir: PathBuf,
    /// The tree content-serving reads from; promotion swaps files here.
    #[serde(default = "StorageConfig::default_serving_dir")]
    pub serving_dir: PathBuf,
}

impl StorageConfig {
    fn default_scratch_dir() -> PathBuf {
        "scratch_dir".into()
    }
    fn default_artifact_dir() -> PathBuf {
        "artifact_dir".into()
    }
    fn default_reduced_dir() -> PathBuf {
        "reduced_dir".into()
    }
    fn default_serving_dir() -> PathBuf {
        "serving_dir".into()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            scratch_dir: Self::default_scratch_dir(),
            artifact_dir: Self::default_artifact_dir(),
            reduced_dir: Self::default_reduced_dir(),
            serving_dir: Self::default_serving_dir(),
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct QueueConfig {
    /// Bounded capacity of every stage queue; the backpressure knob.
    #[serde(default = "QueueConfig::default_capacity")]
    pub capacity: usize,
    #[serde(default = "QueueConfig::default_finalize_workers")]
    pub finalize_workers: usize,
    #[serde(default = "QueueConfig::default_reduction_workers")]
    pub reduction_workers: usize,
    #[serde(default = "QueueConfig::default_promotion_workers")]
    pub promotion_workers: usize,
    #[serde(default = "QueueConfig::default_post_process_workers")]
    pub post_process_workers: usize,
    /// Per-step ceiling for finalize/reduce/promote; elapse counts as Failed.
    #[serde(default = "QueueConfig::default_op_timeout_secs")]
    pub op_timeout_secs: u64,
}

impl QueueConfig {
    fn default_capacity() -> usize {
        128
    }
    fn default_finalize_workers() -> usize {
        2
    }
    fn default_reduction_workers() -> usize {
        4
    }
    fn default_promotion_workers() -> usize {
        2
    }
    fn default_post_process_workers() -> usize {
        1
    }
    fn default_op_timeout_secs() -> u64 {
        600
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
            finalize_workers: Self::default_finalize_workers(),
            reduction_workers: Self::default_reduction_workers(),
            promotion_workers: Self::default_promotion_workers(),
            post_process_workers: Self::default_post_process_workers(),
            op_timeout_secs: Self::default_op_timeout_secs(),
        }
    }
}

#[derive(Default, Clone, Deserialize, Debug)]
pub struct PostProcessConfig {
    /// Report-server metadata refresh hook; absent means no refresh action.
    #[serde(default)]
    pub report_server_refresh_url: Option<url::Url>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct InternalTopics {
    #[serde(default = "InternalTopics::default_finalize")]
    pub finalize: String,
    #[serde(default = "InternalTopics::default_reduction")]
    pub reduction: String,
    #[serde(default = "InternalTopics::default_master_promotion")]
    pub master_promotion: String,
    #[serde(default = "InternalTopics::default_status")]
    pub status: String,
    #[serde(default = "InternalTopics::default_post_process")]
    pub post_process: String,
}

impl InternalTopics {
    fn default_finalize() -> String {
        "upload-finalize".to_string()
    }
    fn default_reduction() -> String {
        "reduction".to_string()
    }
    fn default_master_promotion() -> String {
        "master-promotion".to_string()
    }
    fn default_status() -> String {
        "publication-status".to_string()
    }
    fn default_post_process() -> String {
        "post-processing".to_string()
    }
}

impl Default for InternalTopics {
    fn default() -> Self {
        Self {
            finalize: Self::default_finalize(),
            reduction: Self::default_reduction(),
            master_promotion: Self::default_master_promotion(),
            status: Self::default_status(),
            post_process: Self::default_post_process(),
        }
    }
}
