use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("timed out waiting for {missing} result(s) of generation {generation}")]
    Timeout { generation: u64, missing: usize },

    #[error("encode runner stopped before generation {generation} completed")]
    Disconnected { generation: u64 },
}
