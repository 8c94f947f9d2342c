//! Device contact projection.
//!
//! # Invariants
//! - Records are read-only copies; the platform contact store owns the data.
//! - `phone_numbers` order is the provider's order.

use serde::{Deserialize, Serialize};

/// One phone number entry attached to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    /// Provider label such as `mobile`, when known.
    pub label: Option<String>,
    pub number: String,
}

impl PhoneNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            label: None,
            number: number.into(),
        }
    }
}

/// Read-only projection of one device contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Platform identifier, stable for the lifetime of the provider query.
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Possibly empty.
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
}

impl ContactRecord {
    pub fn new(
        id: impl Into<String>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone_numbers: Vec<PhoneNumber>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.map(str::to_string),
            last_name: last_name.map(str::to_string),
            phone_numbers,
        }
    }

    /// `"{first} {last}"` with missing parts rendered empty and outer
    /// whitespace trimmed.
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    pub fn primary_number(&self) -> Option<&str> {
        self.phone_numbers.first().map(|phone| phone.number.as_str())
    }
}

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub id: String,
    pub title: String,
    /// First phone number, or empty when the contact has none.
    pub subtitle: String,
}

impl From<&ContactRecord> for ContactRow {
    fn from(record: &ContactRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.display_name(),
            subtitle: record.primary_number().unwrap_or_default().to_string(),
        }
    }
}
