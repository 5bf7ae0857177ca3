//! Settings block
//!
//! The in-memory settings, laid out exactly as they are persisted. The block
//! is serialized with postcard using fixed-width little-endian integers, so
//! it always occupies [`BLOCK_SIZE`] bytes:
//!
//! ```text
//! ┌─────────┬──────┬─────────────┬─────┬─────────────┐
//! │ VERSION │ MODE │ ORIENTATION │ ... │ AUTOTURNOFF │
//! │ 2B LE   │ 1B   │ 1B          │     │ 1B          │
//! └─────────┴──────┴─────────────┴─────┴─────────────┘
//! ```
//!
//! Field order follows [`SettingKey`] index order.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use super::key::{ControlMode, Orientation, SettingKey, TriggerFunction, BLOCK_SIZE};
use super::rules::SETTINGS_VERSION;
use crate::throttle::Endpoints;

/// Settings persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Storage medium operation failed
    Storage(firefly_hal::StorageError),
    /// Serialization failed
    Encode,
}

impl From<firefly_hal::StorageError> for SettingsError {
    fn from(e: firefly_hal::StorageError) -> Self {
        SettingsError::Storage(e)
    }
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SettingsError::Storage(e) => write!(f, "settings storage: {}", e),
            SettingsError::Encode => write!(f, "settings block encoding failed"),
        }
    }
}

/// A cross-field relationship that per-field ranges can't express
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Inconsistency {
    /// Throttle endpoints are not strictly ordered min < center < max
    ThrottleEndpoints,
    /// Cell voltage window is empty or inverted
    VoltageWindow,
}

impl Inconsistency {
    /// Settings involved, reset together when the relationship breaks
    pub const fn keys(self) -> &'static [SettingKey] {
        match self {
            Inconsistency::ThrottleEndpoints => &[
                SettingKey::ThrottleMin,
                SettingKey::ThrottleCenter,
                SettingKey::ThrottleMax,
            ],
            Inconsistency::VoltageWindow => &[SettingKey::MinVoltage, SettingKey::MaxVoltage],
        }
    }
}

/// Persisted remote settings
///
/// Mutate through [`set`](Settings::set), which clamps every value into its
/// rule range; fields are private so the block can't drift out of bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    #[serde(with = "postcard::fixint::le")]
    version: u16,
    mode: u8,
    orientation: u8,
    upper_trigger: u8,
    lower_trigger: u8,
    #[serde(with = "postcard::fixint::le")]
    throttle_min: u16,
    #[serde(with = "postcard::fixint::le")]
    throttle_center: u16,
    #[serde(with = "postcard::fixint::le")]
    throttle_max: u16,
    deadzone: u8,
    throttle_limit: u8,
    brake_limit: u8,
    battery_cells: u8,
    #[serde(with = "postcard::fixint::le")]
    min_voltage: u16,
    #[serde(with = "postcard::fixint::le")]
    max_voltage: u16,
    motor_poles: u8,
    motor_pulley: u8,
    wheel_pulley: u8,
    #[serde(with = "postcard::fixint::le")]
    wheel_diameter: u16,
    auto_turnoff: u8,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self::zeroed();
        settings.restore_defaults();
        settings
    }
}

impl Settings {
    const fn zeroed() -> Self {
        Self {
            version: SETTINGS_VERSION,
            mode: 0,
            orientation: 0,
            upper_trigger: 0,
            lower_trigger: 0,
            throttle_min: 0,
            throttle_center: 0,
            throttle_max: 0,
            deadzone: 0,
            throttle_limit: 0,
            brake_limit: 0,
            battery_cells: 0,
            min_voltage: 0,
            max_voltage: 0,
            motor_poles: 0,
            motor_pulley: 0,
            wheel_pulley: 0,
            wheel_diameter: 0,
            auto_turnoff: 0,
        }
    }

    /// Layout version this block was stored with
    pub fn version(&self) -> u16 {
        self.version
    }

    pub(crate) fn stamp_version(&mut self) {
        self.version = SETTINGS_VERSION;
    }

    /// Read a setting
    pub fn get(&self, key: SettingKey) -> u16 {
        match key {
            SettingKey::Mode => self.mode as u16,
            SettingKey::Orientation => self.orientation as u16,
            SettingKey::UpperTrigger => self.upper_trigger as u16,
            SettingKey::LowerTrigger => self.lower_trigger as u16,
            SettingKey::ThrottleMin => self.throttle_min,
            SettingKey::ThrottleCenter => self.throttle_center,
            SettingKey::ThrottleMax => self.throttle_max,
            SettingKey::Deadzone => self.deadzone as u16,
            SettingKey::ThrottleLimit => self.throttle_limit as u16,
            SettingKey::BrakeLimit => self.brake_limit as u16,
            SettingKey::BatteryCells => self.battery_cells as u16,
            SettingKey::MinVoltage => self.min_voltage,
            SettingKey::MaxVoltage => self.max_voltage,
            SettingKey::MotorPoles => self.motor_poles as u16,
            SettingKey::MotorPulley => self.motor_pulley as u16,
            SettingKey::WheelPulley => self.wheel_pulley as u16,
            SettingKey::WheelDiameter => self.wheel_diameter,
            SettingKey::AutoTurnoff => self.auto_turnoff as u16,
        }
    }

    /// Write a setting, clamped into its rule range
    pub fn set(&mut self, key: SettingKey, value: u16) {
        self.store(key, key.rule().clamp(value));
    }

    /// Reset one setting to its factory default
    pub fn restore_default(&mut self, key: SettingKey) {
        self.store(key, key.rule().default);
    }

    /// Reset every setting to its factory default
    pub fn restore_defaults(&mut self) {
        for key in SettingKey::ALL {
            self.restore_default(key);
        }
    }

    // Callers pass values already inside the key's rule range, so the
    // narrowing casts never truncate.
    fn store(&mut self, key: SettingKey, value: u16) {
        match key {
            SettingKey::Mode => self.mode = value as u8,
            SettingKey::Orientation => self.orientation = value as u8,
            SettingKey::UpperTrigger => self.upper_trigger = value as u8,
            SettingKey::LowerTrigger => self.lower_trigger = value as u8,
            SettingKey::ThrottleMin => self.throttle_min = value,
            SettingKey::ThrottleCenter => self.throttle_center = value,
            SettingKey::ThrottleMax => self.throttle_max = value,
            SettingKey::Deadzone => self.deadzone = value as u8,
            SettingKey::ThrottleLimit => self.throttle_limit = value as u8,
            SettingKey::BrakeLimit => self.brake_limit = value as u8,
            SettingKey::BatteryCells => self.battery_cells = value as u8,
            SettingKey::MinVoltage => self.min_voltage = value,
            SettingKey::MaxVoltage => self.max_voltage = value,
            SettingKey::MotorPoles => self.motor_poles = value as u8,
            SettingKey::MotorPulley => self.motor_pulley = value as u8,
            SettingKey::WheelPulley => self.wheel_pulley = value as u8,
            SettingKey::WheelDiameter => self.wheel_diameter = value,
            SettingKey::AutoTurnoff => self.auto_turnoff = value as u8,
        }
    }

    /// Keys whose stored value is outside their rule range
    pub fn out_of_range(&self) -> impl Iterator<Item = SettingKey> + '_ {
        SettingKey::ALL
            .into_iter()
            .filter(move |key| !key.in_range(self.get(*key)))
    }

    /// Broken cross-field relationships
    pub fn inconsistencies(&self) -> Vec<Inconsistency, 2> {
        let mut found = Vec::new();

        let endpoints = self.throttle_endpoints();
        if !(endpoints.low < endpoints.center && endpoints.center < endpoints.high) {
            // Capacity matches the number of checks
            let _ = found.push(Inconsistency::ThrottleEndpoints);
        }

        if self.min_voltage >= self.max_voltage {
            let _ = found.push(Inconsistency::VoltageWindow);
        }

        found
    }

    /// Check that no cross-field relationship is broken
    pub fn is_consistent(&self) -> bool {
        self.inconsistencies().is_empty()
    }

    /// Encode into the fixed-size persisted layout
    pub fn encode(&self) -> Result<[u8; BLOCK_SIZE], SettingsError> {
        let mut buffer = [0u8; BLOCK_SIZE];
        let used = postcard::to_slice(self, &mut buffer)
            .map_err(|_| SettingsError::Encode)?
            .len();
        if used != BLOCK_SIZE {
            return Err(SettingsError::Encode);
        }
        Ok(buffer)
    }

    /// Decode a persisted block without validating field ranges
    ///
    /// Returns `None` if the bytes don't form a block at all. The store
    /// repairs the result before anyone else sees it.
    pub(crate) fn decode(bytes: &[u8]) -> Option<Self> {
        postcard::from_bytes(bytes).ok()
    }

    /// Calibrated hall readings for full brake, neutral and full throttle
    pub fn throttle_endpoints(&self) -> Endpoints {
        Endpoints {
            low: self.throttle_min,
            center: self.throttle_center,
            high: self.throttle_max,
        }
    }

    /// Deadzone half-width in output units
    pub fn deadzone(&self) -> u16 {
        self.deadzone as u16
    }

    pub fn control_mode(&self) -> ControlMode {
        ControlMode::from_value(self.mode as u16)
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_value(self.orientation as u16)
    }

    pub fn upper_trigger(&self) -> TriggerFunction {
        TriggerFunction::from_value(self.upper_trigger as u16)
    }

    pub fn lower_trigger(&self) -> TriggerFunction {
        TriggerFunction::from_value(self.lower_trigger as u16)
    }

    /// Throttle limit in percent
    pub fn throttle_limit(&self) -> u8 {
        self.throttle_limit
    }

    /// Brake limit in percent
    pub fn brake_limit(&self) -> u8 {
        self.brake_limit
    }

    /// Minutes of inactivity before power-off, `None` when disabled
    pub fn auto_turnoff_minutes(&self) -> Option<u8> {
        match self.auto_turnoff {
            0 => None,
            minutes => Some(minutes),
        }
    }

    /// Log every setting with its label
    pub fn log_summary(&self) {
        debug!("Settings v{}:", self.version);
        for key in SettingKey::ALL {
            let value = self.get(key);
            match key.value_name(value) {
                Some(name) => debug!("  {}: {} ({})", key.label(), value, name),
                None => debug!("  {}: {} {}", key.label(), value, key.unit()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::rules::RULES;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_match_rules() {
        let settings = Settings::default();
        assert_eq!(settings.version(), SETTINGS_VERSION);
        for key in SettingKey::ALL {
            assert_eq!(settings.get(key), RULES[key.index()].default, "{:?}", key);
        }
        assert!(settings.is_consistent());
    }

    #[test]
    fn test_set_clamps() {
        let mut settings = Settings::default();

        settings.set(SettingKey::BatteryCells, 0);
        assert_eq!(settings.get(SettingKey::BatteryCells), 1);

        settings.set(SettingKey::WheelDiameter, 5000);
        assert_eq!(settings.get(SettingKey::WheelDiameter), 1000);

        settings.set(SettingKey::Mode, 300);
        assert_eq!(settings.get(SettingKey::Mode), 2);
    }

    #[test]
    fn test_encoded_layout() {
        let mut settings = Settings::default();
        settings.set(SettingKey::ThrottleMin, 0x0123);

        let bytes = settings.encode().unwrap();
        assert_eq!(bytes.len(), BLOCK_SIZE);
        assert_eq!(&bytes[0..2], &SETTINGS_VERSION.to_le_bytes());
        // version(2) + mode, orientation, upper, lower (1 each)
        assert_eq!(&bytes[6..8], &[0x23, 0x01]);
        assert_eq!(bytes[BLOCK_SIZE - 1], 2); // auto turnoff default
    }

    #[test]
    fn test_decode_accepts_out_of_range_values() {
        let mut bytes = Settings::default().encode().unwrap();
        bytes[2] = 9; // mode

        let decoded = Settings::decode(&bytes).unwrap();
        assert_eq!(decoded.get(SettingKey::Mode), 9);
        assert_eq!(decoded.out_of_range().collect::<std::vec::Vec<_>>(), [SettingKey::Mode]);
    }

    #[test]
    fn test_decode_short_block() {
        let bytes = Settings::default().encode().unwrap();
        assert!(Settings::decode(&bytes[..BLOCK_SIZE - 1]).is_none());
    }

    #[test]
    fn test_inconsistent_endpoints() {
        let mut settings = Settings::default();
        settings.set(SettingKey::ThrottleMin, 600);
        assert_eq!(
            settings.inconsistencies().as_slice(),
            &[Inconsistency::ThrottleEndpoints]
        );

        settings.set(SettingKey::ThrottleMin, 100);
        settings.set(SettingKey::MaxVoltage, 280);
        assert_eq!(
            settings.inconsistencies().as_slice(),
            &[Inconsistency::VoltageWindow]
        );
    }

    #[test]
    fn test_auto_turnoff() {
        let mut settings = Settings::default();
        assert_eq!(settings.auto_turnoff_minutes(), Some(2));
        settings.set(SettingKey::AutoTurnoff, 0);
        assert_eq!(settings.auto_turnoff_minutes(), None);
    }

    proptest! {
        #[test]
        fn prop_set_then_get_is_clamp(index in 0usize..SettingKey::ALL.len(), value in any::<u16>()) {
            let key = SettingKey::ALL[index];
            let mut settings = Settings::default();
            settings.set(key, value);

            let rule = key.rule();
            prop_assert_eq!(settings.get(key), value.clamp(rule.min, rule.max));
        }
    }
}
