use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Type mismatch in field '{field}': expected a number, got {value}")]
    TypeMismatch { field: String, value: String },

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
