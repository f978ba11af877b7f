use thiserror::Error;

#[derive(Error, Debug)]
pub enum FillError {
    /// Statement id cannot be mapped to an entity type. Fatal misconfiguration.
    #[error("Entity resolution error: {0}")]
    EntityResolution(String),

    #[error("Mapper '{0}' not found")]
    MapperNotFound(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Property '{0}' not found on entity '{1}'")]
    PropertyNotFound(String, String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

impl FillError {
    /// True for errors that signal a broken mapper/metadata setup rather
    /// than a problem with a single call.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EntityResolution(_) | Self::MapperNotFound(_) | Self::InvalidIdentifier(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FillError>;

impl<T> From<std::sync::PoisonError<T>> for FillError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<serde_json::Error> for FillError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
