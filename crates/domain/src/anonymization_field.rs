use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vigil_core::{AppResult, Namespace, NonEmptyString};

/// Opaque identifier of an anonymization field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnonymizationFieldId(String);

impl AnonymizationFieldId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an identifier received from a caller or a store.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?.into()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for AnonymizationFieldId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Values supplied when creating an anonymization field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnonymizationField {
    /// Field name, such as `user.name`.
    pub field: String,
    /// Whether the field may be sent to the model at all.
    pub allowed: Option<bool>,
    /// Whether the field value is replaced before it leaves the platform.
    pub anonymized: Option<bool>,
}

/// Partial update of the two treatment flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnonymizationFieldPatch {
    /// New `allowed` flag, when provided.
    pub allowed: Option<bool>,
    /// New `anonymized` flag, when provided.
    pub anonymized: Option<bool>,
}

/// A data field flagged for allow-listing and/or anonymization treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizationField {
    id: AnonymizationFieldId,
    field: NonEmptyString,
    allowed: bool,
    anonymized: bool,
    namespace: Namespace,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

impl AnonymizationField {
    /// Creates a new field record owned by `namespace`.
    ///
    /// Flags that are not provided default to `false`.
    pub fn create(
        input: NewAnonymizationField,
        namespace: Namespace,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: AnonymizationFieldId::generate(),
            field: NonEmptyString::new(input.field)?,
            allowed: input.allowed.unwrap_or(false),
            anonymized: input.anonymized.unwrap_or(false),
            namespace,
            created_at: now,
            created_by: created_by.to_owned(),
            updated_at: None,
            updated_by: None,
        })
    }

    /// Rebuilds a persisted record.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: impl Into<String>,
        field: impl Into<String>,
        allowed: bool,
        anonymized: bool,
        namespace: Namespace,
        created_at: DateTime<Utc>,
        created_by: impl Into<String>,
        updated_at: Option<DateTime<Utc>>,
        updated_by: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: AnonymizationFieldId::new(id)?,
            field: NonEmptyString::new(field)?,
            allowed,
            anonymized,
            namespace,
            created_at,
            created_by: created_by.into(),
            updated_at,
            updated_by,
        })
    }

    /// Applies a patch and returns the modified record.
    ///
    /// Returns `None` when the patch would leave both flags unchanged.
    #[must_use]
    pub fn apply_patch(
        &self,
        patch: AnonymizationFieldPatch,
        updated_by: &str,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let allowed = patch.allowed.unwrap_or(self.allowed);
        let anonymized = patch.anonymized.unwrap_or(self.anonymized);

        if allowed == self.allowed && anonymized == self.anonymized {
            return None;
        }

        Some(Self {
            allowed,
            anonymized,
            updated_at: Some(now),
            updated_by: Some(updated_by.to_owned()),
            ..self.clone()
        })
    }

    /// Returns the record identifier.
    #[must_use]
    pub fn id(&self) -> &AnonymizationFieldId {
        &self.id
    }

    /// Returns the field name.
    #[must_use]
    pub fn field(&self) -> &NonEmptyString {
        &self.field
    }

    /// Returns the allow-list flag.
    #[must_use]
    pub fn allowed(&self) -> bool {
        self.allowed
    }

    /// Returns the anonymization flag.
    #[must_use]
    pub fn anonymized(&self) -> bool {
        self.anonymized
    }

    /// Returns the owning namespace.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the subject that created the record.
    #[must_use]
    pub fn created_by(&self) -> &str {
        self.created_by.as_str()
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the subject that last updated the record.
    #[must_use]
    pub fn updated_by(&self) -> Option<&str> {
        self.updated_by.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use vigil_core::Namespace;

    use super::{AnonymizationField, AnonymizationFieldPatch, NewAnonymizationField};

    fn sample_field() -> AnonymizationField {
        let created = AnonymizationField::create(
            NewAnonymizationField {
                field: "host.name".to_owned(),
                allowed: Some(true),
                anonymized: None,
            },
            Namespace::default(),
            "alice",
            Utc::now(),
        );
        match created {
            Ok(field) => field,
            Err(error) => panic!("sample field should be valid: {error}"),
        }
    }

    #[test]
    fn create_defaults_missing_flags_to_false() {
        let field = sample_field();
        assert!(field.allowed());
        assert!(!field.anonymized());
        assert_eq!(field.created_by(), "alice");
        assert!(field.updated_at().is_none());
        assert_eq!(field.id().as_str().len(), 36);
    }

    #[test]
    fn create_rejects_blank_field_name() {
        let created = AnonymizationField::create(
            NewAnonymizationField {
                field: "  ".to_owned(),
                allowed: None,
                anonymized: None,
            },
            Namespace::default(),
            "alice",
            Utc::now(),
        );
        assert!(created.is_err());
    }

    #[test]
    fn patch_with_same_values_is_not_applied() {
        let field = sample_field();
        let patch = AnonymizationFieldPatch {
            allowed: Some(true),
            anonymized: Some(false),
        };
        assert!(field.apply_patch(patch, "bob", Utc::now()).is_none());
        assert!(
            field
                .apply_patch(AnonymizationFieldPatch::default(), "bob", Utc::now())
                .is_none()
        );
    }

    #[test]
    fn patch_records_updater_and_keeps_identity() {
        let field = sample_field();
        let now = field.created_at() + Duration::minutes(5);
        let patched = field.apply_patch(
            AnonymizationFieldPatch {
                allowed: None,
                anonymized: Some(true),
            },
            "bob",
            now,
        );

        let Some(patched) = patched else {
            panic!("changing anonymized should produce an update");
        };
        assert_eq!(patched.id(), field.id());
        assert_eq!(patched.field(), field.field());
        assert!(patched.allowed());
        assert!(patched.anonymized());
        assert_eq!(patched.updated_by(), Some("bob"));
        assert_eq!(patched.updated_at(), Some(now));
        assert_eq!(patched.created_by(), "alice");
    }
}
