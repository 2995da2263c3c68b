use thiserror::Error;

/// Failure of a single codec adapter call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid source image: {0}")]
    InvalidSource(String),

    #[error("encoding failed: {0}")]
    EncodeFailed(String),
}

/// Category of an [`EncodeError`] without its detail message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedFormat,
    InvalidSource,
    EncodeFailed,
}

impl EncodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            EncodeError::InvalidSource(_) => ErrorKind::InvalidSource,
            EncodeError::EncodeFailed(_) => ErrorKind::EncodeFailed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QualityError {
    #[error("quality is not a number")]
    NotANumber,

    #[error("quality {0} is outside 0.0..=1.0")]
    OutOfRange(f32),
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to build encode worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn delivery thread: {0}")]
    DeliveryThread(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_drops_detail() {
        let err = EncodeError::InvalidSource("no pixels".into());
        assert_eq!(err.kind(), ErrorKind::InvalidSource);
        assert_eq!(err.to_string(), "invalid source image: no pixels");
    }
}
