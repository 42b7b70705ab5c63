use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventsError {
    #[error("Failed to serialize result envelope: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write result envelope: {0}")]
    Io(#[from] std::io::Error),
}
