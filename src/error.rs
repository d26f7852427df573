use thiserror::Error;

#[derive(Debug, Error)]
pub enum RbackupError {
    #[error("job {0} already exists")]
    DuplicateName(String),
    #[error("job {0} not found")]
    NotFound(String),
    #[error("invalid path {0}")]
    InvalidPath(String),
    #[error("invalid job: {0}")]
    InvalidJob(String),
    #[error("{0}")]
    Io(String),
    #[error("service control: {0}")]
    External(String),
    #[error("{0}")]
    Config(ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse config: {0}")]
    Parse(String),
    #[error("{0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, RbackupError>;

impl RbackupError {
    /// Wraps an I/O failure with the operation and path it happened on.
    pub fn io(context: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        RbackupError::Io(format!("{}: {}", context, err))
    }

    pub fn external(msg: impl Into<String>) -> Self {
        RbackupError::External(msg.into())
    }
}

impl From<ConfigError> for RbackupError {
    fn from(err: ConfigError) -> Self {
        RbackupError::Config(err)
    }
}
