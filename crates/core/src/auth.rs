use serde::{Deserialize, Serialize};

use crate::Namespace;

/// Caller identity forwarded by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    namespace: Namespace,
}

impl UserIdentity {
    /// Creates a user identity scoped to a namespace.
    #[must_use]
    pub fn new(subject: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            subject: subject.into(),
            namespace,
        }
    }

    /// Returns the stable subject reported by the host platform.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the namespace the caller is acting in.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }
}
