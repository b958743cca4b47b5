use thiserror::Error;

pub type Result<T> = std::result::Result<T, PpgError>;

#[derive(Debug, Error)]
pub enum PpgError {
    /// Least-squares detrending needs at least two points.
    #[error("invalid window size {len}: detrending needs at least 2 samples")]
    InvalidWindowSize { len: usize },

    #[error("window capacity must be greater than zero")]
    ZeroCapacity,

    #[error("frame contains no pixels")]
    EmptyFrame,

    #[error("frame buffer has {actual} bytes, expected {expected} for RGBA pixels")]
    FrameSizeMismatch { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
