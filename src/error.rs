use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("API error: {0}")]
    Api(String),

    #[error("{message} ({status})")]
    Status { status: u16, message: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FolioError {
    /// Build an error from a non-success HTTP status. 403 is kept distinct.
    pub fn from_status(status: u16, message: String) -> Self {
        if status == 403 {
            FolioError::PermissionDenied(message)
        } else {
            FolioError::Status { status, message }
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, FolioError::PermissionDenied(_))
    }

    /// The message a user should see, without the variant prefix.
    pub fn user_message(&self) -> String {
        match self {
            FolioError::Api(msg)
            | FolioError::PermissionDenied(msg)
            | FolioError::Auth(msg)
            | FolioError::Config(msg) => msg.clone(),
            FolioError::Status { message, .. } => message.clone(),
            FolioError::Io(e) => e.to_string(),
        }
    }
}

impl From<reqwest::Error> for FolioError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FolioError::from_status(status.as_u16(), err.to_string()),
            None => FolioError::Api(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_status_is_permission_denied() {
        let err = FolioError::from_status(403, "Must have admin rights".into());
        assert!(err.is_permission_denied());
        assert_eq!(err.user_message(), "Must have admin rights");
    }

    #[test]
    fn other_status_keeps_code() {
        let err = FolioError::from_status(422, "name already exists".into());
        assert!(!err.is_permission_denied());
        assert_eq!(err.to_string(), "name already exists (422)");
    }
}
