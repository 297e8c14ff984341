use thiserror::Error;

use super::repo::RepoError;

/// Failures produced by the user service.
///
/// The business-rule variants carry messages that are safe to show a client;
/// `Internal` keeps its cause for logging only.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user with this email already exists")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user account is inactive")]
    AccountInactive,

    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub fn internal(err: impl Into<anyhow::Error>, context: &'static str) -> Self {
        UserError::Internal(err.into().context(context))
    }
}

impl From<RepoError> for UserError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UniqueViolation => UserError::AlreadyExists,
            other => UserError::Internal(other.into()),
        }
    }
}
