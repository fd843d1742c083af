use thiserror::Error;

/// Startup and lifecycle errors; any of these terminates the process
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ServerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
