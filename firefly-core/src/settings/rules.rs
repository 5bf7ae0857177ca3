//! Settings rule table
//!
//! Factory default and valid range for every persisted setting, indexed by
//! the setting's stable index. This table is the only place defaults and
//! bounds are defined.

/// Current settings layout version
///
/// Bump whenever the persisted block changes shape. A stored block with a
/// different version is discarded and replaced by defaults on load.
pub const SETTINGS_VERSION: u16 = 1;

/// Number of persisted settings
pub const SETTINGS_COUNT: usize = 18;

/// Default and inclusive range for one setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rule {
    /// Factory default
    pub default: u16,
    /// Smallest valid value
    pub min: u16,
    /// Largest valid value
    pub max: u16,
}

impl Rule {
    /// Create a rule
    pub const fn new(default: u16, min: u16, max: u16) -> Self {
        Self { default, min, max }
    }

    /// Check if `value` lies within `[min, max]`
    pub const fn contains(&self, value: u16) -> bool {
        self.min <= value && value <= self.max
    }

    /// Clamp `value` into `[min, max]`
    pub const fn clamp(&self, value: u16) -> u16 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

/// Rules in stable index order
pub const RULES: [Rule; SETTINGS_COUNT] = [
    Rule::new(0, 0, 2),      // Control mode: 0 PPM, 1 PPM & UART, 2 UART only
    Rule::new(0, 0, 1),      // Orientation: 0 left, 1 right handed
    Rule::new(2, 0, 2),      // Upper trigger: 0 disabled, 1 killswitch, 2 cruise
    Rule::new(1, 0, 2),      // Lower trigger: 0 disabled, 1 killswitch, 2 cruise
    Rule::new(100, 0, 1023), // Throttle min (hall reading)
    Rule::new(512, 0, 1023), // Throttle center (hall reading)
    Rule::new(900, 0, 1023), // Throttle max (hall reading)
    Rule::new(5, 0, 100),    // Deadzone (output units)
    Rule::new(0, 0, 100),    // Throttle limit (%)
    Rule::new(0, 0, 100),    // Brake limit (%)
    Rule::new(10, 1, 20),    // Battery cells
    Rule::new(280, 0, 500),  // Min cell voltage (centivolts)
    Rule::new(420, 0, 500),  // Max cell voltage (centivolts)
    Rule::new(14, 1, 250),   // Motor poles
    Rule::new(15, 1, 250),   // Motor pulley teeth
    Rule::new(40, 1, 250),   // Wheel pulley teeth
    Rule::new(90, 1, 1000),  // Wheel diameter (mm)
    Rule::new(2, 0, 60),     // Auto turnoff (minutes, 0 = disabled)
];

/// Check if `value` is valid for the setting at stable `index`
///
/// # Panics
/// If `index >= SETTINGS_COUNT`.
pub const fn in_range(value: u16, index: usize) -> bool {
    RULES[index].contains(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_within_range() {
        for (index, rule) in RULES.iter().enumerate() {
            assert!(rule.min <= rule.max, "rule {} has min > max", index);
            assert!(rule.contains(rule.default), "rule {} default out of range", index);
        }
    }

    #[test]
    fn test_contains_is_inclusive() {
        let rule = Rule::new(5, 1, 20);
        assert!(rule.contains(1));
        assert!(rule.contains(20));
        assert!(!rule.contains(0));
        assert!(!rule.contains(21));
    }

    #[test]
    fn test_in_range_by_index() {
        // Throttle max, 0..=1023
        assert!(in_range(1023, 6));
        assert!(!in_range(1024, 6));
        // Battery cells, 1..=20
        assert!(!in_range(0, 10));
        assert!(in_range(20, 10));
    }

    #[test]
    #[should_panic]
    fn test_in_range_rejects_unknown_index() {
        in_range(0, SETTINGS_COUNT);
    }

    #[test]
    fn test_clamp() {
        let rule = Rule::new(5, 1, 20);
        assert_eq!(rule.clamp(0), 1);
        assert_eq!(rule.clamp(7), 7);
        assert_eq!(rule.clamp(u16::MAX), 20);
    }
}
