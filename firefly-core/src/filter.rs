//! Sample filtering
//!
//! Two stages of noise reduction for analog readings:
//! - [`sample`] averages a burst of back-to-back conversions (noise within
//!   one control cycle)
//! - [`smooth`] is an exponential moving average across cycles
//!
//! Integer-only, no floating point required.

use firefly_hal::{AnalogInput, ADC_MAX};

/// Conversions averaged per sample
pub const SAMPLE_COUNT: u32 = 5;

/// Take [`SAMPLE_COUNT`] readings and return their truncated mean
///
/// Readings above [`ADC_MAX`] are clamped before averaging.
pub fn sample(input: &mut impl AnalogInput) -> u16 {
    let sum: u32 = (0..SAMPLE_COUNT)
        .map(|_| input.read_raw().min(ADC_MAX) as u32)
        .sum();
    (sum / SAMPLE_COUNT) as u16
}

/// Weight of the newest sample in the moving average, in percent
///
/// 100 disables smoothing; smaller values trade responsiveness for
/// stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmoothingFactor(u8);

impl SmoothingFactor {
    /// No smoothing, output follows input
    pub const NONE: Self = Self(100);

    /// Create from a percentage, clamped to `1..=100`
    pub const fn from_percent(percent: u8) -> Self {
        if percent == 0 {
            Self(1)
        } else if percent > 100 {
            Self(100)
        } else {
            Self(percent)
        }
    }

    /// Weight in percent
    pub const fn percent(self) -> u8 {
        self.0
    }
}

/// Smoothing used by the throttle pipeline
pub const DEFAULT_SMOOTHING: SmoothingFactor = SmoothingFactor::from_percent(75);

/// Blend a new sample into the previous smoothed value
///
/// `alpha * sample + (1 - alpha) * previous`, truncated. When `sample` and
/// `previous` are equal the result is exactly that value.
pub fn smooth(sample: u16, previous: u16, alpha: SmoothingFactor) -> u16 {
    let weight = alpha.percent() as u32;
    let blended = weight * sample as u32 + (100 - weight) * previous as u32;
    (blended / 100) as u16
}

/// Input that replays a fixed list of readings, wrapping around
#[cfg(test)]
pub(crate) struct ScriptedInput<'a> {
    readings: &'a [u16],
    next: usize,
}

#[cfg(test)]
impl<'a> ScriptedInput<'a> {
    pub(crate) fn new(readings: &'a [u16]) -> Self {
        Self { readings, next: 0 }
    }

    pub(crate) fn reads(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
impl AnalogInput for ScriptedInput<'_> {
    fn read_raw(&mut self) -> u16 {
        let value = self.readings[self.next % self.readings.len()];
        self.next += 1;
        value
    }
}
