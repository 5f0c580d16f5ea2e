//! Record types for pettrack.
//!
//! This module defines the pet and vaccination records held by the
//! [`RecordStore`](crate::store::RecordStore), along with the input shapes
//! used to create and update them.
//!
//! Records serialize with camelCase field names so stored collections keep
//! the on-device layout used by earlier versions of the app.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Generate a new record identifier.
///
/// Identifiers are random (UUID v4), so records created in quick succession
/// never collide.
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A tracked animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Unique identifier, fixed at creation.
    pub id: String,
    /// The pet's name.
    pub name: String,
    /// Species, e.g. "dog".
    pub species: String,
    /// Breed.
    pub breed: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Weight in kilograms. Always greater than zero.
    pub weight: f64,
    /// Reference to a photo, if one was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    /// The pet's name.
    pub name: String,
    /// Species.
    pub species: String,
    /// Breed.
    pub breed: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Weight in kilograms.
    pub weight: f64,
    /// Optional photo reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
}

/// A partial update to a pet. `None` leaves a field untouched.
///
/// `photo_uri` is doubly optional: `Some(None)` clears the photo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetUpdate {
    /// New name.
    pub name: Option<String>,
    /// New species.
    pub species: Option<String>,
    /// New breed.
    pub breed: Option<String>,
    /// New date of birth.
    pub birth_date: Option<NaiveDate>,
    /// New weight in kilograms.
    pub weight: Option<f64>,
    /// New photo reference, or `Some(None)` to remove it.
    pub photo_uri: Option<Option<String>>,
}

/// An immunization event for one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    /// Unique identifier.
    pub id: String,
    /// Identifier of the owning pet. Not checked against the pet collection.
    pub pet_id: String,
    /// Name of the vaccine.
    pub vaccine_name: String,
    /// Batch or serial number printed on the vial.
    pub serial_number: String,
    /// Date the vaccine was administered.
    pub date: NaiveDate,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when recording a vaccination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVaccination {
    /// Identifier of the owning pet.
    pub pet_id: String,
    /// Name of the vaccine.
    pub vaccine_name: String,
    /// Batch or serial number.
    pub serial_number: String,
    /// Date administered.
    pub date: NaiveDate,
}

/// Age expressed as whole years plus remaining whole months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PetAge {
    /// Completed years.
    pub years: u32,
    /// Completed months past the last birthday (0..12).
    pub months: u32,
}

impl std::fmt::Display for PetAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plural = |n: u32| if n == 1 { "" } else { "s" };
        if self.years > 0 {
            write!(f, "{} year{}", self.years, plural(self.years))
        } else {
            write!(f, "{} month{}", self.months, plural(self.months))
        }
    }
}

fn require_text(record: &'static str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(record, format!("{field} must not be blank")));
    }
    Ok(())
}

fn require_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(Error::validation(
            "pet",
            format!("weight must be a positive number of kilograms, got {weight}"),
        ));
    }
    Ok(())
}

impl NewPet {
    /// Check the fields a pet cannot be saved without.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a text field is blank or the weight is
    /// not a finite positive number.
    pub fn validate(&self) -> Result<()> {
        require_text("pet", "name", &self.name)?;
        require_text("pet", "species", &self.species)?;
        require_text("pet", "breed", &self.breed)?;
        require_weight(self.weight)
    }
}

impl PetUpdate {
    /// Check the supplied fields. Omitted fields are not checked.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a supplied field would break a pet's
    /// invariants.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_text("pet", "name", name)?;
        }
        if let Some(species) = &self.species {
            require_text("pet", "species", species)?;
        }
        if let Some(breed) = &self.breed {
            require_text("pet", "breed", breed)?;
        }
        if let Some(weight) = self.weight {
            require_weight(weight)?;
        }
        Ok(())
    }

    /// Check if this update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Pet {
    /// Build a new pet from validated input, stamping both timestamps with `now`.
    #[must_use]
    pub fn from_new(new: NewPet, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            name: new.name,
            species: new.species,
            breed: new.breed,
            birth_date: new.birth_date,
            weight: new.weight,
            photo_uri: new.photo_uri,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update into this pet and refresh `updated_at`.
    ///
    /// The identifier and creation time are never touched.
    pub fn apply(&mut self, update: PetUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(species) = update.species {
            self.species = species;
        }
        if let Some(breed) = update.breed {
            self.breed = breed;
        }
        if let Some(birth_date) = update.birth_date {
            self.birth_date = birth_date;
        }
        if let Some(weight) = update.weight {
            self.weight = weight;
        }
        if let Some(photo_uri) = update.photo_uri {
            self.photo_uri = photo_uri;
        }
        self.updated_at = now;
    }

    /// Age of the pet on the given day.
    ///
    /// A birth date in the future yields zero.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> PetAge {
        if today <= self.birth_date {
            return PetAge::default();
        }
        let mut months = (today.year() - self.birth_date.year()) * 12
            + i32::try_from(today.month()).unwrap_or(0)
            - i32::try_from(self.birth_date.month()).unwrap_or(0);
        if today.day() < self.birth_date.day() {
            months -= 1;
        }
        let months = u32::try_from(months.max(0)).unwrap_or(0);
        PetAge {
            years: months / 12,
            months: months % 12,
        }
    }
}

impl NewVaccination {
    /// Check the fields a vaccination cannot be saved without.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the vaccine name or serial number is blank.
    pub fn validate(&self) -> Result<()> {
        require_text("vaccination", "vaccine name", &self.vaccine_name)?;
        require_text("vaccination", "serial number", &self.serial_number)
    }
}

impl Vaccination {
    /// Build a new vaccination from validated input.
    #[must_use]
    pub fn from_new(new: NewVaccination, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            pet_id: new.pet_id,
            vaccine_name: new.vaccine_name,
            serial_number: new.serial_number,
            date: new.date,
            created_at: now,
        }
    }
}
