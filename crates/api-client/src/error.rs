use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to send the HTTP request: {0}")]
    RequestBuild(#[from] reqwest::Error),

    #[error("The API request returned HTTP status {0}")]
    HttpStatus(u16),

    #[error("The API request returned an error code: {0}")]
    ApiError(i64),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),

    #[error("No data available for '{0}'")]
    NotFound(String),
}
