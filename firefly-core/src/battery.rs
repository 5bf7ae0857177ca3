//! Remote battery gauge
//!
//! The remote's own Li-ion cell is measured through a 1:2 resistor divider
//! on an analog channel. Everything is integer millivolts.

use firefly_hal::{AnalogInput, ADC_MAX};

use crate::filter::sample;

/// One battery measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryReading {
    /// Cell voltage
    pub millivolts: u16,
    /// Charge estimate, 0..=100
    pub percent: u8,
}

/// Conversion from ADC counts to cell voltage and charge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryGauge {
    /// ADC reference voltage (mV)
    pub reference_mv: u16,
    /// Divider ratio between cell and ADC pin
    pub divider: u16,
    /// Voltage reported as 0%
    pub empty_mv: u16,
    /// Voltage reported as 100%
    pub full_mv: u16,
}

impl Default for BatteryGauge {
    fn default() -> Self {
        Self {
            reference_mv: 3300,
            divider: 2,
            empty_mv: 3400,
            full_mv: 4200,
        }
    }
}

impl BatteryGauge {
    /// Sample the battery channel
    pub fn measure(&self, input: &mut impl AnalogInput) -> BatteryReading {
        let millivolts = self.millivolts_for(sample(input));
        let percent = self.percent_for(millivolts);
        debug!("battery {} mV, {}%", millivolts, percent);
        BatteryReading {
            millivolts,
            percent,
        }
    }

    /// Cell voltage for an averaged ADC reading, saturating at `u16::MAX`
    pub fn millivolts_for(&self, raw: u16) -> u16 {
        let mv = raw.min(ADC_MAX) as u64 * self.reference_mv as u64 * self.divider as u64
            / ADC_MAX as u64;
        mv.min(u16::MAX as u64) as u16
    }

    /// Linear charge estimate between `empty_mv` and `full_mv`, saturating
    pub fn percent_for(&self, millivolts: u16) -> u8 {
        if millivolts >= self.full_mv {
            100
        } else if millivolts <= self.empty_mv {
            0
        } else {
            let span = (self.full_mv - self.empty_mv) as u32;
            ((millivolts - self.empty_mv) as u32 * 100 / span) as u8
        }
    }
}
