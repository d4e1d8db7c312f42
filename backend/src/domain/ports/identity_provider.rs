//! Port for the hosted identity provider that owns passwords.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, NewPassword, UserId};

/// Errors raised by identity provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityProviderError {
    /// Email and password did not match an account.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// The provider could not be reached.
    #[error("identity provider unreachable: {message}")]
    Transport {
        /// Adapter-provided context.
        message: String,
    },
    /// The provider answered with an unexpected status.
    #[error("identity provider rejected request with status {status}: {message}")]
    Rejected {
        /// HTTP status returned.
        status: u16,
        /// Provider message, if any.
        message: String,
    },
    /// The provider's response could not be decoded.
    #[error("identity provider response malformed: {message}")]
    Decode {
        /// Adapter-provided context.
        message: String,
    },
}

impl IdentityProviderError {
    /// Create an [`IdentityProviderError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an [`IdentityProviderError::Rejected`].
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create an [`IdentityProviderError::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<IdentityProviderError> for Error {
    fn from(error: IdentityProviderError) -> Self {
        match error {
            IdentityProviderError::InvalidCredentials => {
                Self::unauthorized("invalid email or password")
            }
            IdentityProviderError::Transport { message } => Self::service_unavailable(message),
            IdentityProviderError::Rejected { status, message } => {
                Self::internal(format!("identity provider status {status}: {message}"))
            }
            IdentityProviderError::Decode { message } => Self::internal(message),
        }
    }
}

/// Password sign-in and password updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials and return the account id.
    async fn sign_in(&self, credentials: &Credentials) -> Result<UserId, IdentityProviderError>;

    /// Replace the password of an account.
    async fn update_password(
        &self,
        user: UserId,
        password: &NewPassword,
    ) -> Result<(), IdentityProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(IdentityProviderError::InvalidCredentials, ErrorCode::Unauthorized)]
    #[case(IdentityProviderError::transport("timeout"), ErrorCode::ServiceUnavailable)]
    #[case(IdentityProviderError::rejected(500, "boom"), ErrorCode::InternalError)]
    #[case(IdentityProviderError::decode("bad json"), ErrorCode::InternalError)]
    fn maps_to_domain_codes(#[case] error: IdentityProviderError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }
}
