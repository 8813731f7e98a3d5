use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown legacy code: {0}")]
    UnknownLegacy(String),
    #[error("unknown schema variant: {0}")]
    UnknownSchema(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
