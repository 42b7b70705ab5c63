use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A string could not be parsed into a domain value. Holds the kind and the raw text.
    #[error("Unrecognized {0}: '{1}'")]
    InvalidInput(String, String),
}
