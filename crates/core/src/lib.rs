//! Shared primitives for all Rust crates in Vigil.

#![forbid(unsafe_code)]

/// Identity primitives shared across services.
pub mod auth;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across Vigil crates.
pub type AppResult<T> = Result<T, AppError>;

/// Namespace used when a request does not name a space explicitly.
pub const DEFAULT_NAMESPACE: &str = "default";

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Platform space that partitions every persisted resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace(String);

impl Namespace {
    /// Creates a namespace from a space identifier.
    ///
    /// Space identifiers are lowercase and may contain digits, `-` and `_`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let is_valid = !value.is_empty()
            && value.chars().all(|character| {
                character.is_ascii_lowercase()
                    || character.is_ascii_digit()
                    || character == '-'
                    || character == '_'
            });

        if !is_valid {
            return Err(AppError::Validation(format!(
                "invalid namespace '{value}': expected lowercase letters, digits, '-' or '_'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the underlying space identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(DEFAULT_NAMESPACE.to_owned())
    }
}

impl Display for Namespace {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller identity is missing.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is identified but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A backing store refused the operation under its security policy.
    #[error("security exception: {0}")]
    SecurityPolicy(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
