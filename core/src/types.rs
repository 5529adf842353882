//! Domain DTOs for the pet API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! `Pet::id` is not optional: the identifier is caller-assigned and every
//! operation addresses a pet by it, so a pet without one cannot be built.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a pet in the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

impl PetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Sold => "sold",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single pet as sent to and returned by the API.
///
/// Every field is always serialized. Unknown fields in responses are ignored,
/// and a missing `photoUrls` array decodes as empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    pub status: PetStatus,
}

impl Pet {
    pub fn new(id: i64, name: impl Into<String>, status: PetStatus) -> Self {
        Self {
            id,
            name: name.into(),
            photo_urls: Vec::new(),
            status,
        }
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_urls.push(url.into());
        self
    }

    /// Copy of this pet with a new name. The identifier is kept.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy of this pet with a new status. The identifier is kept.
    pub fn with_status(&self, status: PetStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
