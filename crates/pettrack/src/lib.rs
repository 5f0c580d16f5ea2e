//! `pettrack` - On-device records for pets and their vaccinations
//!
//! This library provides the record store that keeps pets, vaccinations and
//! the theme preference in memory and mirrors them to a local key-value
//! backend.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod storage;
pub mod store;
pub mod theme;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{NewPet, NewVaccination, Pet, PetUpdate, Vaccination};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use store::RecordStore;
pub use theme::{Theme, ThemeMode};
