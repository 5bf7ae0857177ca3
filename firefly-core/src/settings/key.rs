//! Setting keys
//!
//! Each persisted setting has a stable index, used for storage order, the
//! rule table, and index-based access from the settings menu. `SettingKey`
//! gives that index a name.

use super::rules::{Rule, RULES, SETTINGS_COUNT};

/// Storage width of a setting in the persisted block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldWidth {
    /// One byte
    U8,
    /// Two bytes, little-endian
    U16,
}

impl FieldWidth {
    /// Width in bytes
    pub const fn bytes(self) -> usize {
        match self {
            FieldWidth::U8 => 1,
            FieldWidth::U16 => 2,
        }
    }
}

/// Persisted setting, in stable index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SettingKey {
    Mode = 0,
    Orientation = 1,
    UpperTrigger = 2,
    LowerTrigger = 3,
    ThrottleMin = 4,
    ThrottleCenter = 5,
    ThrottleMax = 6,
    Deadzone = 7,
    ThrottleLimit = 8,
    BrakeLimit = 9,
    BatteryCells = 10,
    MinVoltage = 11,
    MaxVoltage = 12,
    MotorPoles = 13,
    MotorPulley = 14,
    WheelPulley = 15,
    WheelDiameter = 16,
    AutoTurnoff = 17,
}

impl SettingKey {
    /// All keys in index order
    pub const ALL: [SettingKey; SETTINGS_COUNT] = [
        SettingKey::Mode,
        SettingKey::Orientation,
        SettingKey::UpperTrigger,
        SettingKey::LowerTrigger,
        SettingKey::ThrottleMin,
        SettingKey::ThrottleCenter,
        SettingKey::ThrottleMax,
        SettingKey::Deadzone,
        SettingKey::ThrottleLimit,
        SettingKey::BrakeLimit,
        SettingKey::BatteryCells,
        SettingKey::MinVoltage,
        SettingKey::MaxVoltage,
        SettingKey::MotorPoles,
        SettingKey::MotorPulley,
        SettingKey::WheelPulley,
        SettingKey::WheelDiameter,
        SettingKey::AutoTurnoff,
    ];

    /// Stable index of this key
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a key by stable index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Default and range for this key
    pub const fn rule(self) -> Rule {
        RULES[self.index()]
    }

    /// Check if `value` is valid for this key
    pub const fn in_range(self, value: u16) -> bool {
        self.rule().contains(value)
    }

    /// Storage width
    pub const fn width(self) -> FieldWidth {
        match self {
            SettingKey::ThrottleMin
            | SettingKey::ThrottleCenter
            | SettingKey::ThrottleMax
            | SettingKey::MinVoltage
            | SettingKey::MaxVoltage
            | SettingKey::WheelDiameter => FieldWidth::U16,
            _ => FieldWidth::U8,
        }
    }

    /// Menu label
    pub const fn label(self) -> &'static str {
        match self {
            SettingKey::Mode => "Control mode",
            SettingKey::Orientation => "Orientation",
            SettingKey::UpperTrigger => "Top trigger",
            SettingKey::LowerTrigger => "Lower trigger",
            SettingKey::ThrottleMin => "Throttle min",
            SettingKey::ThrottleCenter => "Throttle center",
            SettingKey::ThrottleMax => "Throttle max",
            SettingKey::Deadzone => "Deadzone",
            SettingKey::ThrottleLimit => "Throttle limit",
            SettingKey::BrakeLimit => "Brake limit",
            SettingKey::BatteryCells => "Battery cells",
            SettingKey::MinVoltage => "Min voltage",
            SettingKey::MaxVoltage => "Max voltage",
            SettingKey::MotorPoles => "Motor poles",
            SettingKey::MotorPulley => "Motor pulley",
            SettingKey::WheelPulley => "Wheel pulley",
            SettingKey::WheelDiameter => "Wheel diameter",
            SettingKey::AutoTurnoff => "Turnoff timer",
        }
    }

    /// Display unit, empty when the value is unitless
    ///
    /// Voltages are stored in centivolts but shown in volts.
    pub const fn unit(self) -> &'static str {
        match self {
            SettingKey::ThrottleLimit | SettingKey::BrakeLimit => "%",
            SettingKey::BatteryCells => "S",
            SettingKey::MotorPulley | SettingKey::WheelPulley => "T",
            SettingKey::WheelDiameter => "mm",
            SettingKey::MinVoltage | SettingKey::MaxVoltage => "V",
            SettingKey::AutoTurnoff => "min",
            _ => "",
        }
    }

    /// Names for each value of an enumerated setting
    ///
    /// Returns `None` for plain numeric settings.
    pub const fn value_names(self) -> Option<&'static [&'static str]> {
        match self {
            SettingKey::Mode => Some(&ControlMode::NAMES),
            SettingKey::Orientation => Some(&Orientation::NAMES),
            SettingKey::UpperTrigger | SettingKey::LowerTrigger => Some(&TriggerFunction::NAMES),
            _ => None,
        }
    }

    /// Name of `value` for an enumerated setting
    pub fn value_name(self, value: u16) -> Option<&'static str> {
        self.value_names()
            .and_then(|names| names.get(value as usize))
            .copied()
    }
}

/// Size of the version tag at the start of the persisted block
pub const VERSION_BYTES: usize = 2;

/// Size of the persisted block in bytes
pub const BLOCK_SIZE: usize = block_size();

const fn block_size() -> usize {
    let mut size = VERSION_BYTES;
    let mut i = 0;
    while i < SETTINGS_COUNT {
        size += SettingKey::ALL[i].width().bytes();
        i += 1;
    }
    size
}

/// How the remote talks to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMode {
    /// PPM signal only
    Ppm,
    /// PPM signal plus UART telemetry
    PpmUart,
    /// UART only
    Uart,
}

impl ControlMode {
    const NAMES: [&'static str; 3] = ["PPM", "PPM & UART", "UART only"];

    /// Decode a stored value, saturating at the last variant
    pub const fn from_value(value: u16) -> Self {
        match value {
            0 => ControlMode::Ppm,
            1 => ControlMode::PpmUart,
            _ => ControlMode::Uart,
        }
    }
}

/// Which hand holds the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    Left,
    Right,
}

impl Orientation {
    const NAMES: [&'static str; 2] = ["Left", "Right"];

    /// Decode a stored value, saturating at the last variant
    pub const fn from_value(value: u16) -> Self {
        match value {
            0 => Orientation::Left,
            _ => Orientation::Right,
        }
    }
}

/// Function bound to a trigger button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerFunction {
    /// Button does nothing
    Disabled,
    /// Throttle only passes while held
    Killswitch,
    /// Holds the current speed while pressed
    Cruise,
}

impl TriggerFunction {
    const NAMES: [&'static str; 3] = ["Disabled", "Killswitch", "Cruise"];

    /// Decode a stored value, saturating at the last variant
    pub const fn from_value(value: u16) -> Self {
        match value {
            0 => TriggerFunction::Disabled,
            1 => TriggerFunction::Killswitch,
            _ => TriggerFunction::Cruise,
        }
    }
}
