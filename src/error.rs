use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaterWalletError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Estimator unavailable: {0}")]
    Estimator(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl WaterWalletError {
    /// Process exit code used by the command line.
    pub fn exit_code(&self) -> i32 {
        match self {
            WaterWalletError::InvalidRequest(_) => 2,
            WaterWalletError::Config(_) => 3,
            WaterWalletError::Estimator(_) => 4,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, WaterWalletError>;
