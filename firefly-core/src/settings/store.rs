//! Settings persistence
//!
//! Owns the settings block and the storage medium it lives in. Loading never
//! fails: a missing, unreadable or outdated block is replaced by defaults,
//! and individual out-of-range fields are repaired in place.

use heapless::Vec;

use firefly_hal::NvStorage;

use super::block::{Inconsistency, Settings, SettingsError};
use super::key::{SettingKey, BLOCK_SIZE};
use super::rules::{SETTINGS_COUNT, SETTINGS_VERSION};

/// Offset of the settings block within the storage medium
pub const BLOCK_OFFSET: usize = 0;

/// Why `load` discarded the stored block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetReason {
    /// Stored layout version differs (includes blank storage)
    VersionMismatch,
    /// Block could not be read or decoded
    Unreadable,
}

/// What `load` did to get a valid block
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadOutcome {
    /// Stored block was valid as-is
    Loaded,
    /// Some fields were restored to defaults and the block rewritten
    Repaired {
        /// Restored keys, in index order per pass
        keys: Vec<SettingKey, SETTINGS_COUNT>,
    },
    /// Whole block replaced by defaults
    Reset(ResetReason),
}

/// Settings store
///
/// The single writer of the persisted block. Construct once at startup
/// with [`open`](SettingsStore::open) and hand out `&Settings` to readers.
pub struct SettingsStore<S> {
    storage: S,
    settings: Settings,
}

impl<S: NvStorage> SettingsStore<S> {
    /// Create a store holding defaults, without touching storage
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            settings: Settings::default(),
        }
    }

    /// Create a store and load the persisted block
    pub fn open(storage: S) -> (Self, LoadOutcome) {
        let mut store = Self::new(storage);
        let outcome = store.load();
        (store, outcome)
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Borrow the storage medium
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and return the storage medium
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Load settings from storage
    ///
    /// Resets to defaults if the block can't be read or has another layout
    /// version. Otherwise restores each out-of-range field to its default,
    /// then restores any broken cross-field group, and rewrites the block
    /// once if anything changed.
    ///
    /// A group is checked after its fields are repaired. If a member's
    /// default breaks the relationship with values that were stored intact,
    /// the whole group returns to defaults along with it.
    pub fn load(&mut self) -> LoadOutcome {
        let mut settings = match self.read_block() {
            Ok(settings) => settings,
            Err(reason) => {
                warn!("Settings unusable ({}), restoring defaults", reason);
                if let Err(e) = self.reset() {
                    warn!("Failed to persist default settings: {}", e);
                }
                return LoadOutcome::Reset(reason);
            }
        };

        let mut repaired: Vec<SettingKey, SETTINGS_COUNT> = Vec::new();

        for key in SettingKey::ALL {
            let value = settings.get(key);
            if !key.in_range(value) {
                warn!("Setting {} out of range ({}), using default", key.label(), value);
                settings.restore_default(key);
                // At most one entry per key
                let _ = repaired.push(key);
            }
        }

        for inconsistency in settings.inconsistencies() {
            warn!("Settings inconsistent ({}), restoring group defaults", inconsistency);
            for &key in inconsistency.keys() {
                settings.restore_default(key);
                if !repaired.contains(&key) {
                    let _ = repaired.push(key);
                }
            }
        }

        self.settings = settings;

        if repaired.is_empty() {
            info!("Loaded settings from storage");
            self.settings.log_summary();
            return LoadOutcome::Loaded;
        }

        if let Err(e) = self.save() {
            warn!("Failed to persist repaired settings: {}", e);
        }
        info!("Loaded settings, {} field(s) restored", repaired.len());
        LoadOutcome::Repaired { keys: repaired }
    }

    fn read_block(&mut self) -> Result<Settings, ResetReason> {
        let mut buffer = [0u8; BLOCK_SIZE];
        self.storage
            .read(BLOCK_OFFSET, &mut buffer)
            .map_err(|_| ResetReason::Unreadable)?;

        let settings = Settings::decode(&buffer).ok_or(ResetReason::Unreadable)?;

        if settings.version() != SETTINGS_VERSION {
            debug!(
                "Settings version mismatch: found {}, expected {}",
                settings.version(),
                SETTINGS_VERSION
            );
            return Err(ResetReason::VersionMismatch);
        }

        Ok(settings)
    }

    /// Restore every setting to its default and persist
    pub fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = Settings::default();
        info!("Settings reset to defaults");
        self.save()
    }

    /// Stamp the layout version and persist the whole block in one write
    pub fn save(&mut self) -> Result<(), SettingsError> {
        self.settings.stamp_version();
        let bytes = self.settings.encode()?;
        self.storage.write(BLOCK_OFFSET, &bytes)?;
        debug!("Saved {} bytes of settings", bytes.len());
        Ok(())
    }

    /// Read a setting
    pub fn get(&self, key: SettingKey) -> u16 {
        self.settings.get(key)
    }

    /// Broken cross-field relationships in the current settings
    ///
    /// `set` doesn't check these, so an editor should before saving.
    pub fn inconsistencies(&self) -> Vec<Inconsistency, 2> {
        self.settings.inconsistencies()
    }

    /// Write a setting, clamped into its rule range
    ///
    /// Only changes memory; call [`save`](Self::save) to persist.
    pub fn set(&mut self, key: SettingKey, value: u16) {
        self.settings.set(key, value);
    }

    /// Read a setting by stable index
    ///
    /// # Panics
    /// If `index >= SETTINGS_COUNT`.
    pub fn get_value(&self, index: usize) -> u16 {
        self.get(SettingKey::ALL[index])
    }

    /// Write a setting by stable index, clamped into its rule range
    ///
    /// # Panics
    /// If `index >= SETTINGS_COUNT`.
    pub fn set_value(&mut self, index: usize, value: u16) {
        self.set(SettingKey::ALL[index], value);
    }
}

impl core::fmt::Display for ResetReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ResetReason::VersionMismatch => write!(f, "version mismatch"),
            ResetReason::Unreadable => write!(f, "unreadable"),
        }
    }
}
