//! Analog input abstractions
//!
//! The remote samples two analog channels: the hall sensor under the
//! throttle lever and the divided-down voltage of its own cell. Both are
//! read through a 10-bit converter.

/// Largest value a 10-bit analog reading can take
pub const ADC_MAX: u16 = 1023;

/// A single analog channel
///
/// Implementations return one conversion per call, in `0..=ADC_MAX`.
/// Reading has no side effects beyond the physical measurement, so callers
/// may take several readings back to back and average them.
pub trait AnalogInput {
    /// Take one raw reading
    fn read_raw(&mut self) -> u16;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read_raw(&mut self) -> u16 {
        (**self).read_raw()
    }
}
