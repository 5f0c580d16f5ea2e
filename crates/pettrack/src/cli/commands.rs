//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::record::{NewPet, NewVaccination, PetUpdate};

/// Pet commands.
#[derive(Debug, Subcommand)]
pub enum PetCommand {
    /// Add a new pet
    Add(PetAddArgs),

    /// List all pets
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show one pet with its vaccination history
    Show {
        /// Pet identifier
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Change some fields of a pet
    Update(PetUpdateArgs),

    /// Delete a pet and all of its vaccinations
    Delete {
        /// Pet identifier
        id: String,
    },
}

/// Arguments for `pet add`.
#[derive(Debug, Args)]
pub struct PetAddArgs {
    /// Name
    #[arg(long)]
    pub name: String,

    /// Species, e.g. "dog"
    #[arg(long)]
    pub species: String,

    /// Breed
    #[arg(long)]
    pub breed: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub birth_date: NaiveDate,

    /// Weight in kilograms
    #[arg(long, value_name = "KG")]
    pub weight: f64,

    /// Photo URI
    #[arg(long, value_name = "URI")]
    pub photo: Option<String>,
}

impl From<PetAddArgs> for NewPet {
    fn from(args: PetAddArgs) -> Self {
        Self {
            name: args.name,
            species: args.species,
            breed: args.breed,
            birth_date: args.birth_date,
            weight: args.weight,
            photo_uri: args.photo,
        }
    }
}

/// Arguments for `pet update`.
#[derive(Debug, Args)]
pub struct PetUpdateArgs {
    /// Pet identifier
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New species
    #[arg(long)]
    pub species: Option<String>,

    /// New breed
    #[arg(long)]
    pub breed: Option<String>,

    /// New date of birth (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub birth_date: Option<NaiveDate>,

    /// New weight in kilograms
    #[arg(long, value_name = "KG")]
    pub weight: Option<f64>,

    /// New photo URI
    #[arg(long, value_name = "URI", conflicts_with = "clear_photo")]
    pub photo: Option<String>,

    /// Remove the photo
    #[arg(long)]
    pub clear_photo: bool,
}

impl PetUpdateArgs {
    /// Split into the target identifier and the update to apply.
    #[must_use]
    pub fn into_update(self) -> (String, PetUpdate) {
        let photo_uri = if self.clear_photo {
            Some(None)
        } else {
            self.photo.map(Some)
        };
        let update = PetUpdate {
            name: self.name,
            species: self.species,
            breed: self.breed,
            birth_date: self.birth_date,
            weight: self.weight,
            photo_uri,
        };
        (self.id, update)
    }
}

/// Vaccination commands.
#[derive(Debug, Subcommand)]
pub enum VaccinationCommand {
    /// Record a vaccination
    Add(VaccinationAddArgs),

    /// List vaccinations
    List {
        /// Only this pet's vaccinations, newest first
        #[arg(short, long, value_name = "PET_ID")]
        pet: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Delete a vaccination
    Delete {
        /// Vaccination identifier
        id: String,
    },
}

/// Arguments for `vaccination add`.
#[derive(Debug, Args)]
pub struct VaccinationAddArgs {
    /// Identifier of the vaccinated pet
    #[arg(long, value_name = "PET_ID")]
    pub pet: String,

    /// Vaccine name
    #[arg(long)]
    pub vaccine: String,

    /// Serial or batch number
    #[arg(long)]
    pub serial: String,

    /// Date administered (YYYY-MM-DD), defaults to today
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,
}

impl VaccinationAddArgs {
    /// Build the record input, filling in `today` when no date was given.
    #[must_use]
    pub fn into_new(self, today: NaiveDate) -> NewVaccination {
        NewVaccination {
            pet_id: self.pet,
            vaccine_name: self.vaccine.trim().to_string(),
            serial_number: self.serial.trim().to_string(),
            date: self.date.unwrap_or(today),
        }
    }
}

/// Theme commands.
#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Show the active theme
    Show {
        /// Output the full palette as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Switch between light and dark
    Toggle,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_args(id: &str) -> PetUpdateArgs {
        PetUpdateArgs {
            id: id.to_string(),
            name: None,
            species: None,
            breed: None,
            birth_date: None,
            weight: None,
            photo: None,
            clear_photo: false,
        }
    }

    #[test]
    fn test_pet_add_args_into_new_pet() {
        let args = PetAddArgs {
            name: "Rex".to_string(),
            species: "dog".to_string(),
            breed: "beagle".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2020, 3, 15).unwrap(),
            weight: 5.0,
            photo: None,
        };
        let pet = NewPet::from(args);
        assert_eq!(pet.name, "Rex");
        assert!(pet.photo_uri.is_none());
    }

    #[test]
    fn test_update_args_untouched_photo() {
        let (id, update) = update_args("p1").into_update();
        assert_eq!(id, "p1");
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_args_set_and_clear_photo() {
        let mut args = update_args("p1");
        args.photo = Some("file:///a.jpg".to_string());
        let (_, update) = args.into_update();
        assert_eq!(update.photo_uri, Some(Some("file:///a.jpg".to_string())));

        let mut args = update_args("p1");
        args.clear_photo = true;
        let (_, update) = args.into_update();
        assert_eq!(update.photo_uri, Some(None));
    }

    #[test]
    fn test_vaccination_args_default_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let args = VaccinationAddArgs {
            pet: "p1".to_string(),
            vaccine: " Rabies ".to_string(),
            serial: "RB-1".to_string(),
            date: None,
        };
        let new = args.into_new(today);
        assert_eq!(new.date, today);
        assert_eq!(new.vaccine_name, "Rabies");
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
