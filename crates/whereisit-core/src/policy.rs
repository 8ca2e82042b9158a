//! Secret-key authorization.
//!
//! Every category and item carries a shared secret key. Mutating a record
//! requires presenting that key as the *confirm key*, unless the confirm key
//! equals the process-wide administrator key, which may act on any record.
//!
//! The policy only decides which predicate a statement needs and which key
//! the row should hold afterwards. Whether a row actually matched is learned
//! from the affected-row count, so "wrong key" and "no such record" look the
//! same to the caller.
//!
//! Keys are compared with plain string equality.

use std::fmt;

/// The administrator key. Never blank.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminKey(String);

impl AdminKey {
    /// Wrap an administrator key. Returns `None` for blank input, which
    /// disables the administrator bypass entirely.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// The raw key.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminKey(..)")
    }
}

/// Which predicate a mutation must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// The confirm key matched the administrator key. No key predicate.
    Admin,
    /// The row's `secret_key` must equal this confirm key.
    Owner { confirm_key: String },
}

impl Authorization {
    /// Whether the administrator bypass applies.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether the statement must match on the stored secret key.
    pub fn requires_match(&self) -> bool {
        !self.is_admin()
    }
}

/// What the `secret_key` column should hold after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyUpdate {
    /// Re-assign the value the row already holds.
    Keep,
    /// Store a new key.
    Replace(String),
}

impl KeyUpdate {
    /// Interpret a submitted replacement key. Missing or whitespace-only
    /// input means no change was requested.
    pub fn from_submitted(replacement: Option<&str>) -> Self {
        match replacement {
            Some(key) if !key.trim().is_empty() => Self::Replace(key.to_string()),
            _ => Self::Keep,
        }
    }

    /// The new key, if one is being stored.
    pub fn key_to_store(&self) -> Option<&str> {
        match self {
            Self::Keep => None,
            Self::Replace(key) => Some(key),
        }
    }
}

/// Full decision for an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDecision {
    pub authorization: Authorization,
    pub key_update: KeyUpdate,
}

impl UpdateDecision {
    pub fn is_admin(&self) -> bool {
        self.authorization.is_admin()
    }

    pub fn requires_match(&self) -> bool {
        self.authorization.requires_match()
    }

    pub fn key_to_store(&self) -> Option<&str> {
        self.key_update.key_to_store()
    }
}

/// Decides how a mutation is authorized.
///
/// The administrator key is injected at construction, so tests can build a
/// policy with any key (or none).
#[derive(Debug, Clone, Default)]
pub struct SecretKeyPolicy {
    admin_key: Option<AdminKey>,
}

impl SecretKeyPolicy {
    /// Create a policy with the given administrator key.
    pub fn new(admin_key: Option<AdminKey>) -> Self {
        Self { admin_key }
    }

    /// A policy where only record owners may mutate.
    pub fn without_admin() -> Self {
        Self { admin_key: None }
    }

    /// Whether an administrator key is configured.
    pub fn has_admin(&self) -> bool {
        self.admin_key.is_some()
    }

    /// Whether `confirm_key` is the administrator key.
    pub fn is_admin(&self, confirm_key: &str) -> bool {
        matches!(&self.admin_key, Some(admin) if admin.0 == confirm_key)
    }

    /// Authorization for a delete.
    pub fn authorize(&self, confirm_key: &str) -> Authorization {
        if self.is_admin(confirm_key) {
            Authorization::Admin
        } else {
            Authorization::Owner {
                confirm_key: confirm_key.to_string(),
            }
        }
    }

    /// Authorization plus key handling for an update.
    pub fn authorize_update(
        &self,
        confirm_key: &str,
        replacement_key: Option<&str>,
    ) -> UpdateDecision {
        UpdateDecision {
            authorization: self.authorize(confirm_key),
            key_update: KeyUpdate::from_submitted(replacement_key),
        }
    }
}
