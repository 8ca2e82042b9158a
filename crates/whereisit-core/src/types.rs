//! Core data types for the WhereIsIt lost-and-found board.
//!
//! This module defines the records visitors browse and mutate:
//!
//! - Categories group items ("Laptop", "Money", ...)
//! - Items are lost or found objects, each filed under one or more categories
//! - Contacts are phone-style strings normalized to digits with an optional `+`
//!
//! Secret keys never appear on the read types here. They are write-only
//! inputs carried by [`NewCategory`], [`CategoryChange`], [`NewItem`] and
//! [`ItemChange`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

// ============================================================================
// ID Types
// ============================================================================

/// Identifier of a category, generated by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i32);

impl CategoryId {
    /// Wraps a raw database identifier.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw database identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CategoryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Identifier of an item, generated by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i32);

impl ItemId {
    /// Wraps a raw database identifier.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw database identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

// ============================================================================
// Status
// ============================================================================

/// Whether an item was lost or found.
///
/// Stored as an integer column constrained to `0` or `1`, and serialized the
/// same way so API payloads match the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ItemStatus {
    /// Someone lost this item (`0`).
    Lost,
    /// Someone found this item (`1`).
    Found,
}

impl ItemStatus {
    /// The integer stored in the `status` column.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Lost => 0,
            Self::Found => 1,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<i32> for ItemStatus {
    type Error = InvalidStatus;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Lost),
            1 => Ok(Self::Found),
            other => Err(InvalidStatus(other)),
        }
    }
}

impl From<ItemStatus> for i32 {
    fn from(status: ItemStatus) -> Self {
        status.code()
    }
}

/// An integer that is not a valid [`ItemStatus`] code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStatus(pub i32);

impl fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid item status {}: expected 0 (lost) or 1 (found)", self.0)
    }
}

impl std::error::Error for InvalidStatus {}

// ============================================================================
// Contact
// ============================================================================

/// Maximum length of a normalized contact (matches `VARCHAR(20)`).
pub const MAX_CONTACT_LEN: usize = 20;

/// Strip a contact string down to an optional leading `+` followed by digits.
///
/// Spaces, dashes, parentheses and any other characters are dropped. A `+`
/// is kept only when it is the first non-whitespace character.
pub fn normalize_contact(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut normalized = String::with_capacity(trimmed.len());
    if trimmed.starts_with('+') {
        normalized.push('+');
    }
    normalized.extend(trimmed.chars().filter(char::is_ascii_digit));
    normalized
}

/// A normalized contact number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Contact(String);

impl Contact {
    /// Normalize and validate a raw contact string.
    pub fn parse(raw: &str) -> Result<Self, ContactError> {
        let normalized = normalize_contact(raw);
        if !normalized.chars().any(|c| c.is_ascii_digit()) {
            return Err(ContactError::NoDigits);
        }
        if normalized.len() > MAX_CONTACT_LEN {
            return Err(ContactError::TooLong(normalized.len()));
        }
        Ok(Self(normalized))
    }

    /// The normalized contact.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Contact {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Contact {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Error type for parsing a [`Contact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactError {
    /// Nothing left after normalization.
    NoDigits,
    /// Normalized contact exceeds [`MAX_CONTACT_LEN`].
    TooLong(usize),
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDigits => write!(f, "contact must contain at least one digit"),
            Self::TooLong(len) => write!(
                f,
                "contact too long: {} characters, at most {} allowed",
                len, MAX_CONTACT_LEN
            ),
        }
    }
}

impl std::error::Error for ContactError {}

// ============================================================================
// Read Types
// ============================================================================

/// A category as shown to visitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// An item as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Name the poster goes by.
    pub username: String,
    pub details: Option<String>,
    pub contact: String,
    /// When the item was posted. Set once by the database.
    pub added: DateTime<Utc>,
    pub status: ItemStatus,
}

/// An item together with every category it is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    #[serde(flatten)]
    pub item: Item,
    pub categories: Vec<Category>,
}

/// An item listed under one category, carrying that category's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedItem {
    #[serde(flatten)]
    pub item: Item,
    pub category_name: String,
}

// ============================================================================
// Write Types
// ============================================================================

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    /// Owner credential required for later edits.
    pub secret_key: String,
}

/// Input for renaming a category and optionally rotating its key.
#[derive(Debug, Clone)]
pub struct CategoryChange {
    pub id: CategoryId,
    pub name: String,
    /// The current secret key, or the administrator key.
    pub confirm_key: String,
    /// New secret key. Blank means keep the current one.
    pub replacement_key: Option<String>,
}

/// Input for posting an item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub username: String,
    pub details: Option<String>,
    pub contact: Contact,
    pub status: ItemStatus,
    /// Categories to file the item under. Must not be empty.
    pub categories: Vec<CategoryId>,
    pub secret_key: String,
}

/// Input for editing an item. Every column is assigned.
#[derive(Debug, Clone)]
pub struct ItemChange {
    pub id: ItemId,
    pub name: String,
    pub username: String,
    pub details: Option<String>,
    pub contact: Contact,
    pub status: ItemStatus,
    /// The full desired category set. Must not be empty.
    pub categories: Vec<CategoryId>,
    pub confirm_key: String,
    pub replacement_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_id_display_fromstr() {
        let id = CategoryId::new(42);
        let parsed: CategoryId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("abc".parse::<CategoryId>().is_err());
    }

    #[test]
    fn item_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&ItemId::new(7)).unwrap();
        assert_eq!(json, "7");
        let parsed: ItemId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, ItemId::new(7));
    }

    #[test]
    fn status_codes() {
        assert_eq!(ItemStatus::Lost.code(), 0);
        assert_eq!(ItemStatus::Found.code(), 1);
        assert_eq!(ItemStatus::try_from(1), Ok(ItemStatus::Found));
        assert_eq!(ItemStatus::try_from(2), Err(InvalidStatus(2)));
    }

    #[test]
    fn status_serde_uses_integers() {
        assert_eq!(serde_json::to_string(&ItemStatus::Found).unwrap(), "1");
        let lost: ItemStatus = serde_json::from_str("0").unwrap();
        assert_eq!(lost, ItemStatus::Lost);
        assert!(serde_json::from_str::<ItemStatus>("5").is_err());
    }

    #[test]
    fn normalize_contact_keeps_leading_plus_and_digits() {
        assert_eq!(normalize_contact(" +1 (555) 123-4567 "), "+15551234567");
        assert_eq!(normalize_contact("555.123.4567"), "5551234567");
        assert_eq!(normalize_contact("1+2"), "12");
        assert_eq!(normalize_contact("call me"), "");
    }

    #[test]
    fn contact_parse_validates() {
        let contact = Contact::parse("+1 555 123 4567").unwrap();
        assert_eq!(contact.as_str(), "+15551234567");
        assert_eq!(Contact::parse("+"), Err(ContactError::NoDigits));
        assert_eq!(
            Contact::parse("123456789012345678901"),
            Err(ContactError::TooLong(21))
        );
    }

    #[test]
    fn contact_deserialize_normalizes() {
        let contact: Contact = serde_json::from_str(r#""+44 20-7946-0958""#).unwrap();
        assert_eq!(contact.as_str(), "+442079460958");
        assert!(serde_json::from_str::<Contact>(r#""n/a""#).is_err());
    }

    #[test]
    fn item_details_flattens_item() {
        let details = ItemDetails {
            item: Item {
                id: ItemId::new(1),
                name: "Ring".to_string(),
                username: "baklick".to_string(),
                details: None,
                contact: "+12834567890".to_string(),
                added: DateTime::<Utc>::UNIX_EPOCH,
                status: ItemStatus::Found,
            },
            categories: vec![Category {
                id: CategoryId::new(3),
                name: "Gold".to_string(),
            }],
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["name"], "Ring");
        assert_eq!(json["status"], 1);
        assert_eq!(json["categories"][0]["name"], "Gold");
    }
}
