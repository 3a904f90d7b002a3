use thiserror::Error;

/// Library error type for fillview operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A dispatch name that no registry method answers to.
    #[error("method '{0}' does not exist on fillview")]
    UnknownMethod(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}
