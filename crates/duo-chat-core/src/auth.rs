//! Static shared-secret authentication.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Identity;

/// Password table construction error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Password for {0} must not be empty")]
    EmptyPassword(Identity),
    #[error("User1 and User2 passwords must differ")]
    DuplicatePassword,
}

/// Outcome of a password check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_identity: Option<Identity>,
    pub message: String,
}

impl AuthResult {
    fn granted(identity: Identity) -> Self {
        Self {
            success: true,
            user_identity: Some(identity),
            message: format!("{} authenticated successfully", identity.label()),
        }
    }

    fn denied() -> Self {
        Self {
            success: false,
            user_identity: None,
            message: "Invalid password".to_string(),
        }
    }
}

/// The two shared secrets, one per identity.
#[derive(Clone)]
pub struct PasswordTable {
    user1: String,
    user2: String,
}

impl std::fmt::Debug for PasswordTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordTable")
            .field("user1", &"<redacted>")
            .field("user2", &"<redacted>")
            .finish()
    }
}

impl PasswordTable {
    /// Build a password table.
    ///
    /// # Errors
    /// Returns error if a password is empty or both are the same.
    pub fn new(user1: impl Into<String>, user2: impl Into<String>) -> Result<Self, AuthError> {
        let (user1, user2) = (user1.into(), user2.into());
        if user1.is_empty() {
            return Err(AuthError::EmptyPassword(Identity::User1));
        }
        if user2.is_empty() {
            return Err(AuthError::EmptyPassword(Identity::User2));
        }
        if user1 == user2 {
            return Err(AuthError::DuplicatePassword);
        }
        Ok(Self { user1, user2 })
    }

    /// Check a password and describe the result.
    #[must_use]
    pub fn validate_password(&self, password: &str) -> AuthResult {
        self.identity_for(password)
            .map_or_else(AuthResult::denied, AuthResult::granted)
    }

    /// Identity owning `password`, if any. User1 is checked first.
    #[must_use]
    pub fn identity_for(&self, password: &str) -> Option<Identity> {
        Identity::ALL
            .into_iter()
            .find(|identity| secrets_match(self.secret(*identity), password))
    }

    fn secret(&self, identity: Identity) -> &str {
        match identity {
            Identity::User1 => &self.user1,
            Identity::User2 => &self.user2,
        }
    }
}

/// Compare without stopping at the first differing byte.
fn secrets_match(expected: &str, presented: &str) -> bool {
    let (a, b) = (expected.as_bytes(), presented.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
