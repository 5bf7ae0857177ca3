//! Persistent remote settings
//!
//! Eighteen numeric settings with compiled-in defaults and ranges, stored
//! as one fixed-size versioned block in non-volatile storage.

pub mod block;
pub mod key;
pub mod rules;
pub mod store;

pub use block::{Inconsistency, Settings, SettingsError};
pub use key::{
    ControlMode, FieldWidth, Orientation, SettingKey, TriggerFunction, BLOCK_SIZE, VERSION_BYTES,
};
pub use rules::{in_range, Rule, RULES, SETTINGS_COUNT, SETTINGS_VERSION};
pub use store::{LoadOutcome, ResetReason, SettingsStore, BLOCK_OFFSET};
