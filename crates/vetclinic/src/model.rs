//! Core record types for the clinic domain.
//!
//! This module defines the entities persisted by the storage layer:
//! owners, their pets, pet visits, vets with specialties, and the
//! derived phonetic index entries. Field validation lives here so every
//! write path checks the same rules before touching storage.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Accepted telephone shape: 10 or 11 digits, no separators.
const TELEPHONE_PATTERN: &str = r"^[0-9]{10,11}$";

fn telephone_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(TELEPHONE_PATTERN).expect("valid telephone pattern"))
}

fn require_non_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "must not be blank"));
    }
    Ok(())
}

/// A pet owner, the primary customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Unique identifier (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Given name.
    pub first_name: String,

    /// Family name; the field the phonetic search runs against.
    pub last_name: String,

    /// Street address.
    pub address: String,

    /// City.
    pub city: String,

    /// Contact telephone, digits only.
    pub telephone: String,
}

impl Owner {
    /// Create a new owner that has not been stored yet.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        telephone: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            city: city.into(),
            telephone: telephone.into(),
        }
    }

    /// The owner's display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check all fields before the record reaches storage.
    ///
    /// # Errors
    ///
    /// Returns a [`Error::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        require_non_blank("first_name", &self.first_name)?;
        require_non_blank("last_name", &self.last_name)?;
        require_non_blank("address", &self.address)?;
        require_non_blank("city", &self.city)?;
        if !telephone_regex().is_match(&self.telephone) {
            return Err(Error::validation(
                "telephone",
                "must contain 10 to 11 digits",
            ));
        }
        Ok(())
    }
}

/// A pet, owned by exactly one [`Owner`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// Unique identifier (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// The owning [`Owner`]'s id.
    pub owner_id: i64,

    /// Call name.
    pub name: String,

    /// Kind of animal (dog, cat, bird, ...), free text.
    pub species: String,

    /// Date of birth.
    pub birth_date: NaiveDate,
}

impl Pet {
    /// Create a new pet that has not been stored yet.
    #[must_use]
    pub fn new(
        owner_id: i64,
        name: impl Into<String>,
        species: impl Into<String>,
        birth_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            owner_id,
            name: name.into(),
            species: species.into(),
            birth_date,
        }
    }

    /// Check all fields before the record reaches storage.
    ///
    /// # Errors
    ///
    /// Returns a [`Error::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        require_non_blank("name", &self.name)?;
        require_non_blank("species", &self.species)
    }
}

/// A single visit of a pet to the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    /// Unique identifier (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// The visited [`Pet`]'s id.
    pub pet_id: i64,

    /// Date of the visit.
    pub date: NaiveDate,

    /// What the visit was about.
    pub description: String,
}

impl Visit {
    /// Create a new visit that has not been stored yet.
    #[must_use]
    pub fn new(pet_id: i64, date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            id: None,
            pet_id,
            date,
            description: description.into(),
        }
    }

    /// Check all fields before the record reaches storage.
    ///
    /// # Errors
    ///
    /// Returns a [`Error::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        require_non_blank("description", &self.description)
    }
}

/// A veterinarian with zero or more specialties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vet {
    /// Unique identifier (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Specialty names, alphabetical.
    #[serde(default)]
    pub specialties: Vec<String>,
}

impl Vet {
    /// Create a new vet that has not been stored yet.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            specialties: Vec::new(),
        }
    }

    /// The vet's display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check all fields before the record reaches storage.
    ///
    /// # Errors
    ///
    /// Returns a [`Error::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        require_non_blank("first_name", &self.first_name)?;
        require_non_blank("last_name", &self.last_name)
    }
}

/// A named vet specialty (radiology, surgery, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    /// Unique identifier (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Unique specialty name.
    pub name: String,
}

/// A derived phonetic index entry mapping a code to its owner.
///
/// Entries are regenerated by the storage layer whenever the owner's
/// names change; they are never edited directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneticEntry {
    /// Unique identifier (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// The owner this entry points back to.
    pub owner_id: i64,

    /// Phonetic code of one of the owner's name fields.
    pub code: String,
}
