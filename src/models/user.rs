//! User identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

/// Authenticated user ID (the `sub` claim issued by the identity provider).
///
/// Always non-empty; construct with [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate a raw identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, AppError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AppError::InvalidInput("user id is required".to_string()));
        }
        // Padded ids are rejected, not normalized, so " u1" never maps to "u1"
        if raw.trim() != raw {
            return Err(AppError::InvalidInput(
                "user id has surrounding whitespace".to_string(),
            ));
        }
        if raw.chars().any(char::is_control) {
            return Err(AppError::InvalidInput(
                "user id contains control characters".to_string(),
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}
