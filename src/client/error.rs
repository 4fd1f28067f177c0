use std::time::Duration;

use crate::error::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an error envelope.
    #[error("{message} (status {status})")]
    Api {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response could not be decoded: {0}")]
    Decode(String),
    #[error("not signed in")]
    Unauthenticated,
    #[error("token store error: {0}")]
    Storage(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ClientError::Api { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}
