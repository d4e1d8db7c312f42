//! Account profiles, role assignments and credentials.

use std::fmt;

use super::{MessId, Role, UserId};

/// Shortest password accepted by [`NewPassword::new`].
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Personal details for an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Account identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Sign-in email.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Whether the account still uses the temporary password it was issued.
    pub has_temporary_password: bool,
}

/// The single role assignment of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Account identifier.
    pub user_id: UserId,
    /// Granted role.
    pub role: Role,
    /// Mess an owner is assigned to.
    pub mess_id: Option<MessId>,
}

/// What the signed-in user sees about themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountView {
    /// Personal details.
    pub profile: Profile,
    /// Granted role.
    pub role: Role,
    /// Mess an owner is assigned to.
    pub mess_id: Option<MessId>,
}

/// Validation failures for credentials and passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email empty once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
}

/// Email and password submitted at sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Validate and construct sign-in credentials.
    ///
    /// # Examples
    /// ```
    /// use mess_backend::domain::Credentials;
    ///
    /// let creds = Credentials::new(" owner@example.com ", "secret").expect("valid");
    /// assert_eq!(creds.email(), "owner@example.com");
    /// ```
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: password.to_owned(),
        })
    }

    /// Normalised email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Raw password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A replacement password meeting the length rule.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(String);

impl NewPassword {
    /// Validate a replacement password.
    pub fn new(password: impl Into<String>) -> Result<Self, CredentialsValidationError> {
        let password = password.into();
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CredentialsValidationError::PasswordTooShort);
        }
        Ok(Self(password))
    }

    /// Raw password.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(<redacted>)")
    }
}
