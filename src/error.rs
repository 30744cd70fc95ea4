use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid container size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("circular unit dependency: {cycle}")]
    CircularDependency { cycle: String },

    #[error("unknown series `{0}`")]
    UnknownSeries(String),

    #[error("option parse error: {0}")]
    OptionParse(#[from] serde_json::Error),
}
