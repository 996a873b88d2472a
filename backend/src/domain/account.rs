//! Accounts, credentials and the actor performing an operation.
//!
//! Passwords are opaque strings compared verbatim by the identity service.
//! They are held in [`Zeroizing`] buffers so they are wiped on drop, but they
//! are not hashed.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Validation failures for usernames and credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Trimmed, non-empty account name.
///
/// # Examples
/// ```
/// use bloodbridge::domain::Username;
///
/// let name = Username::new("  alice ").unwrap();
/// assert_eq!(name.as_ref(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CredentialsValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = CredentialsValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Username and password pair submitted at signup or login.
///
/// ## Invariants
/// - `username` satisfies [`Username`] rules.
/// - `password` is non-empty; surrounding whitespace is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    password: Zeroizing<String>,
}

impl Credentials {
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A donor/requester account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub username: Username,
    pub password: Zeroizing<String>,
    pub last_donation: Option<NaiveDate>,
}

impl UserAccount {
    /// New account with no recorded donation.
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            username: credentials.username().clone(),
            password: Zeroizing::new(credentials.password().to_owned()),
            last_donation: None,
        }
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.as_str() == candidate
    }
}

/// An administrator account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub username: Username,
    pub password: Zeroizing<String>,
}

impl AdminAccount {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            username: credentials.username().clone(),
            password: Zeroizing::new(credentials.password().to_owned()),
        }
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.as_str() == candidate
    }
}

/// Account tables an identity can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Admin => "admin",
        })
    }
}

/// Identity on whose behalf an engine operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User(Username),
    Admin(Username),
}

impl Actor {
    /// The username when the actor is a signed-in user.
    pub fn as_user(&self) -> Option<&Username> {
        match self {
            Self::User(name) => Some(name),
            _ => None,
        }
    }

    /// The username when the actor is a signed-in admin.
    pub fn as_admin(&self) -> Option<&Username> {
        match self {
            Self::Admin(name) => Some(name),
            _ => None,
        }
    }
}
