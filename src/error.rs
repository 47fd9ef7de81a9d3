use thiserror::Error;

pub type Result<T> = std::result::Result<T, IgnitionError>;

#[derive(Debug, Error)]
pub enum IgnitionError {
    #[error("Dependency not found: {type_name}")]
    DependencyNotFound { type_name: String },

    #[error("Failed to downcast type: {type_name}")]
    DowncastFailed { type_name: String },
}
