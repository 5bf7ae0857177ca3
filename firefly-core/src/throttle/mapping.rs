//! Throttle mapping
//!
//! Maps a smoothed hall reading onto the throttle output range using the
//! user's calibration points. Brake and throttle halves are mapped
//! separately because the lever's neutral point is rarely midway between
//! its end stops.

use super::{OUTPUT_CENTER, OUTPUT_MAX, OUTPUT_MIN};

/// Calibrated hall readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Endpoints {
    /// Reading at full brake
    pub low: u16,
    /// Reading at neutral
    pub center: u16,
    /// Reading at full throttle
    pub high: u16,
}

/// Output scale of the throttle command
///
/// Always ordered `min <= center <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputRange {
    min: u16,
    center: u16,
    max: u16,
}

impl OutputRange {
    /// Create a range, `None` unless `min <= center <= max`
    pub const fn new(min: u16, center: u16, max: u16) -> Option<Self> {
        if min <= center && center <= max {
            Some(Self { min, center, max })
        } else {
            None
        }
    }

    /// Full brake
    pub const fn min(&self) -> u16 {
        self.min
    }

    /// Neutral
    pub const fn center(&self) -> u16 {
        self.center
    }

    /// Full throttle
    pub const fn max(&self) -> u16 {
        self.max
    }
}

impl Default for OutputRange {
    fn default() -> Self {
        Self {
            min: OUTPUT_MIN,
            center: OUTPUT_CENTER,
            max: OUTPUT_MAX,
        }
    }
}

/// Linear map of `x` from `[in_start, in_end]` onto `[out_start, out_end]`
///
/// Integer arithmetic, truncating toward zero, no clamping to the output
/// segment. Results beyond `i32` saturate. A zero-width input segment maps
/// `x` at or below it to `out_start` and above it to `out_end`.
pub fn remap(x: u16, in_start: u16, in_end: u16, out_start: u16, out_end: u16) -> i32 {
    let (x, in_start, in_end) = (x as i64, in_start as i64, in_end as i64);
    let (out_start, out_end) = (out_start as i64, out_end as i64);

    if in_start == in_end {
        let end = if x > in_start { out_end } else { out_start };
        return end as i32;
    }

    let mapped = (x - in_start) * (out_end - out_start) / (in_end - in_start) + out_start;
    mapped.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Map a smoothed hall reading onto `range`
///
/// At or above the center point the reading maps onto `[center, max]`,
/// below it onto `[min, center]`. Either half is clamped, so readings past
/// a calibrated end stop saturate. Endpoint ordering is not checked here;
/// [`Settings::inconsistencies`](crate::settings::Settings::inconsistencies)
/// guards that.
pub fn calibrate(raw: u16, endpoints: Endpoints, range: OutputRange) -> u16 {
    if raw >= endpoints.center {
        let mapped = remap(raw, endpoints.center, endpoints.high, range.center, range.max);
        mapped.clamp(range.center as i32, range.max as i32) as u16
    } else {
        let mapped = remap(raw, endpoints.low, endpoints.center, range.min, range.center);
        mapped.clamp(range.min as i32, range.center as i32) as u16
    }
}

/// Snap values within `width` of `center` to exactly `center`
///
/// A width of zero disables the deadzone.
pub fn apply_deadzone(value: u16, center: u16, width: u16) -> u16 {
    if (value as i32 - center as i32).abs() < width as i32 {
        center
    } else {
        value
    }
}
