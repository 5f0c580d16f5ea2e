//! The record store.
//!
//! [`RecordStore`] owns the in-memory pet and vaccination collections, the
//! theme flag and the current selection. Every mutation rewrites the whole
//! affected collection through the injected [`KeyValueStore`]; startup reads
//! every collection back.
//!
//! Write failures are returned to the caller but the in-memory change is kept,
//! so memory and storage can diverge until the next successful write of the
//! same key.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chrono::NaiveDate;
//! use pettrack::record::NewPet;
//! use pettrack::storage::MemoryStore;
//! use pettrack::RecordStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> pettrack::Result<()> {
//! let mut store = RecordStore::open(Arc::new(MemoryStore::new())).await;
//!
//! let rex = store
//!     .create_pet(NewPet {
//!         name: "Rex".to_string(),
//!         species: "dog".to_string(),
//!         breed: "beagle".to_string(),
//!         birth_date: NaiveDate::from_ymd_opt(2020, 3, 15).unwrap(),
//!         weight: 5.0,
//!         photo_uri: None,
//!     })
//!     .await?;
//!
//! assert_eq!(store.pets().len(), 1);
//! store.delete_pet(&rex.id).await?;
//! assert!(store.pets().is_empty());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::record::{NewPet, NewVaccination, Pet, PetUpdate, Vaccination};
use crate::storage::{KeyValueStore, PETS_KEY, THEME_KEY, VACCINATIONS_KEY};
use crate::theme::{Theme, ThemeMode};

/// In-memory view of all records, synchronized to a key-value backend.
#[derive(Debug)]
pub struct RecordStore {
    kv: Arc<dyn KeyValueStore>,
    pets: Vec<Pet>,
    vaccinations: Vec<Vaccination>,
    theme: ThemeMode,
    selected: Option<Pet>,
    loading: bool,
    revision: watch::Sender<u64>,
}

impl RecordStore {
    /// Create an empty store over `kv`. Nothing is read until [`load`](Self::load).
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            kv,
            pets: Vec::new(),
            vaccinations: Vec::new(),
            theme: ThemeMode::default(),
            selected: None,
            loading: true,
            revision,
        }
    }

    /// Create a store over `kv` and load everything it holds.
    pub async fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self::new(kv);
        store.load().await;
        store
    }

    /// Read all three keys from the backend.
    ///
    /// Keys are read concurrently and independently. A missing key keeps its
    /// default; a key that cannot be read or parsed is logged and also keeps
    /// its default. This never fails.
    pub async fn load(&mut self) {
        let (pets, vaccinations, theme) = tokio::join!(
            self.kv.get(PETS_KEY),
            self.kv.get(VACCINATIONS_KEY),
            self.kv.get(THEME_KEY),
        );

        self.pets = decode_collection(PETS_KEY, pets);
        self.vaccinations = decode_collection(VACCINATIONS_KEY, vaccinations);
        self.theme = decode_theme(theme);

        if self.loading {
            self.loading = false;
            info!(
                pets = self.pets.len(),
                vaccinations = self.vaccinations.len(),
                theme = %self.theme,
                backend = self.kv.backend_name(),
                "Record store loaded"
            );
        }
        self.bump();
    }

    /// Release the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to flush.
    pub async fn close(self) -> Result<()> {
        debug!("Closing record store");
        self.kv.close().await
    }

    // === State ===

    /// All pets in insertion order.
    #[must_use]
    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    /// All vaccinations in insertion order.
    #[must_use]
    pub fn vaccinations(&self) -> &[Vaccination] {
        &self.vaccinations
    }

    /// The active theme mode.
    #[must_use]
    pub fn theme_mode(&self) -> ThemeMode {
        self.theme
    }

    /// The active theme preset.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    /// The currently selected pet, if any.
    #[must_use]
    pub fn selected_pet(&self) -> Option<&Pet> {
        self.selected.as_ref()
    }

    /// True until the first [`load`](Self::load) has finished.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The backend this store writes to.
    #[must_use]
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    /// Look up a pet by identifier.
    #[must_use]
    pub fn pet(&self, id: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == id)
    }

    /// A pet's vaccination history, most recent administration first.
    #[must_use]
    pub fn vaccinations_for(&self, pet_id: &str) -> Vec<&Vaccination> {
        let mut history: Vec<&Vaccination> = self
            .vaccinations
            .iter()
            .filter(|v| v.pet_id == pet_id)
            .collect();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        history
    }

    /// Subscribe to change notifications.
    ///
    /// The receiver sees a revision number that increases after every load
    /// and every in-memory change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // === Mutations ===

    /// Add a new pet and persist the pet collection.
    ///
    /// # Errors
    ///
    /// Returns a validation error (nothing changes) or a storage error (the
    /// pet stays in memory).
    pub async fn create_pet(&mut self, new: NewPet) -> Result<Pet> {
        new.validate()?;
        let pet = Pet::from_new(new, Utc::now());
        debug!(id = %pet.id, name = %pet.name, "Creating pet");

        self.pets.push(pet.clone());
        self.bump();
        self.persist(PETS_KEY, &self.pets).await?;
        Ok(pet)
    }

    /// Merge `update` into the pet with `id` and persist the pet collection.
    ///
    /// Returns `Ok(None)` without touching anything if no such pet exists.
    /// A selected pet is refreshed to the updated value.
    ///
    /// # Errors
    ///
    /// Returns a validation error (nothing changes) or a storage error (the
    /// update stays in memory).
    pub async fn update_pet(&mut self, id: &str, update: PetUpdate) -> Result<Option<Pet>> {
        update.validate()?;
        let Some(pet) = self.pets.iter_mut().find(|p| p.id == id) else {
            debug!(id, "Ignoring update for unknown pet");
            return Ok(None);
        };
        pet.apply(update, Utc::now());
        let updated = pet.clone();

        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = Some(updated.clone());
        }
        self.bump();
        self.persist(PETS_KEY, &self.pets).await?;
        Ok(Some(updated))
    }

    /// Remove a pet together with all of its vaccinations.
    ///
    /// Both collections are written concurrently. If either write fails the
    /// error is returned; the other write is still allowed to finish.
    /// Returns whether a pet was removed.
    ///
    /// # Errors
    ///
    /// Returns the first storage error of the two writes.
    pub async fn delete_pet(&mut self, id: &str) -> Result<bool> {
        let pets_before = self.pets.len();
        let vaccinations_before = self.vaccinations.len();
        self.pets.retain(|p| p.id != id);
        self.vaccinations.retain(|v| v.pet_id != id);
        let removed = self.pets.len() != pets_before;

        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = None;
        }
        self.bump();
        debug!(
            id,
            removed,
            vaccinations_removed = vaccinations_before - self.vaccinations.len(),
            "Deleting pet"
        );

        let (pets, vaccinations) = tokio::join!(
            self.persist(PETS_KEY, &self.pets),
            self.persist(VACCINATIONS_KEY, &self.vaccinations),
        );
        if pets.is_err() || vaccinations.is_err() {
            warn!(id, "Cascade delete only partially persisted");
        }
        pets?;
        vaccinations?;
        Ok(removed)
    }

    /// Set or clear the selection. No persistence and no existence check.
    pub fn select_pet(&mut self, pet: Option<Pet>) {
        self.selected = pet;
        self.bump();
    }

    /// Record a vaccination and persist the vaccination collection.
    ///
    /// `pet_id` is stored as given, whether or not that pet exists.
    ///
    /// # Errors
    ///
    /// Returns a validation error (nothing changes) or a storage error (the
    /// vaccination stays in memory).
    pub async fn add_vaccination(&mut self, new: NewVaccination) -> Result<Vaccination> {
        new.validate()?;
        if self.pet(&new.pet_id).is_none() {
            debug!(pet_id = %new.pet_id, "Recording vaccination for unknown pet");
        }
        let vaccination = Vaccination::from_new(new, Utc::now());

        self.vaccinations.push(vaccination.clone());
        self.bump();
        self.persist(VACCINATIONS_KEY, &self.vaccinations).await?;
        Ok(vaccination)
    }

    /// Remove a vaccination by identifier and persist the collection.
    ///
    /// An unknown identifier changes nothing in memory; the collection is
    /// still rewritten. Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub async fn delete_vaccination(&mut self, id: &str) -> Result<bool> {
        let before = self.vaccinations.len();
        self.vaccinations.retain(|v| v.id != id);
        let removed = self.vaccinations.len() != before;
        if removed {
            self.bump();
        }
        self.persist(VACCINATIONS_KEY, &self.vaccinations).await?;
        Ok(removed)
    }

    /// Switch between the light and dark presets and persist the flag.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the flag cannot be written. The in-memory
    /// mode is switched regardless.
    pub async fn toggle_theme(&mut self) -> Result<ThemeMode> {
        self.theme = self.theme.toggled();
        self.bump();
        debug!(theme = %self.theme, "Toggling theme");
        self.kv
            .set(THEME_KEY, self.theme.as_str().to_string())
            .await
            .inspect_err(|e| error!(key = THEME_KEY, "Write failed: {e}"))?;
        Ok(self.theme)
    }

    async fn persist<T: Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let blob = serde_json::to_string(records)?;
        self.kv
            .set(key, blob)
            .await
            .inspect_err(|e| error!(key, "Write failed: {e}"))
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}

fn decode_collection<T: DeserializeOwned>(key: &str, read: Result<Option<String>>) -> Vec<T> {
    match read {
        Ok(Some(blob)) => match serde_json::from_str(&blob) {
            Ok(records) => records,
            Err(e) => {
                error!(key, "Discarding unreadable stored collection: {e}");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            error!(key, "Failed to read stored collection: {e}");
            Vec::new()
        }
    }
}

fn decode_theme(read: Result<Option<String>>) -> ThemeMode {
    match read {
        Ok(Some(value)) => ThemeMode::from_stored(&value).unwrap_or_else(|| {
            warn!(key = THEME_KEY, value = %value, "Unknown theme value, using light");
            ThemeMode::default()
        }),
        Ok(None) => ThemeMode::default(),
        Err(e) => {
            error!(key = THEME_KEY, "Failed to read theme: {e}");
            ThemeMode::default()
        }
    }
}
