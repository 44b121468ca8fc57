use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown axis `{0}`")]
    UnknownAxis(String),

    #[error("path parse error at byte {position}: {message}")]
    PathParse { position: usize, message: String },

    #[error("label callback failed: {0}")]
    LabelCallback(String),

    #[error("invalid json contract: {0}")]
    Json(#[from] serde_json::Error),
}
