//! Throttle pipeline
//!
//! One call per control loop iteration. The only state carried between
//! calls is the smoothed hall value, held in a [`CalibrationState`] that the
//! caller owns and passes in each cycle.

use firefly_hal::AnalogInput;

use super::mapping::{apply_deadzone, calibrate, OutputRange};
use crate::filter::{sample, smooth, SmoothingFactor, DEFAULT_SMOOTHING};
use crate::settings::Settings;

/// Values from the most recent throttle cycle
///
/// Readable by display and telemetry; only the pipeline updates it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationState {
    raw: u16,
    smoothed: Option<u16>,
    output: u16,
}

impl CalibrationState {
    /// Power-up state, nothing sampled yet
    pub const fn new() -> Self {
        Self {
            raw: 0,
            smoothed: None,
            output: 0,
        }
    }

    /// State whose smoother continues from `smoothed`
    pub const fn seeded(smoothed: u16) -> Self {
        Self {
            raw: smoothed,
            smoothed: Some(smoothed),
            output: 0,
        }
    }

    /// Averaged hall reading of the last cycle
    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// Smoothed hall reading, `None` before the first cycle
    pub fn smoothed(&self) -> Option<u16> {
        self.smoothed
    }

    /// Throttle command of the last cycle
    pub fn output(&self) -> u16 {
        self.output
    }
}

/// Fixed parameters of the throttle pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThrottlePipeline {
    /// Moving-average weight of each new sample
    pub smoothing: SmoothingFactor,
    /// Output scale
    pub range: OutputRange,
}

impl Default for ThrottlePipeline {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            range: OutputRange::default(),
        }
    }
}

impl ThrottlePipeline {
    /// Sample the hall sensor and compute this cycle's throttle command
    pub fn compute(
        &self,
        hall: &mut impl AnalogInput,
        settings: &Settings,
        state: &mut CalibrationState,
    ) -> u16 {
        let raw = sample(hall);
        self.update(raw, settings, state)
    }

    /// Compute this cycle's throttle command from an averaged reading
    ///
    /// The first reading after power-up seeds the smoother directly.
    pub fn update(&self, raw: u16, settings: &Settings, state: &mut CalibrationState) -> u16 {
        let smoothed = match state.smoothed {
            Some(previous) => smooth(raw, previous, self.smoothing),
            None => raw,
        };

        let mapped = calibrate(smoothed, settings.throttle_endpoints(), self.range);
        let output = apply_deadzone(mapped, self.range.center(), settings.deadzone());

        state.raw = raw;
        state.smoothed = Some(smoothed);
        state.output = output;
        output
    }
}

/// Compute the throttle command with the default pipeline
pub fn compute_throttle(
    hall: &mut impl AnalogInput,
    settings: &Settings,
    state: &mut CalibrationState,
) -> u16 {
    ThrottlePipeline::default().compute(hall, settings, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ScriptedInput;
    use crate::settings::SettingKey;
    use crate::throttle::{OUTPUT_CENTER, OUTPUT_MAX, OUTPUT_MIN};

    #[test]
    fn test_first_cycle_seeds_smoother() {
        let settings = Settings::default();
        let mut state = CalibrationState::new();
        let mut hall = ScriptedInput::new(&[900]);

        assert_eq!(compute_throttle(&mut hall, &settings, &mut state), OUTPUT_MAX);
        assert_eq!(state.raw(), 900);
        assert_eq!(state.smoothed(), Some(900));
        assert_eq!(state.output(), OUTPUT_MAX);
        assert_eq!(hall.reads(), 5);
    }

    #[test]
    fn test_calibration_points() {
        let settings = Settings::default();
        let pipeline = ThrottlePipeline::default();

        for (raw, expected) in [(512, 512), (900, 1023), (100, 0), (515, 512)] {
            let mut state = CalibrationState::seeded(raw);
            assert_eq!(pipeline.update(raw, &settings, &mut state), expected, "raw {}", raw);
        }
    }

    #[test]
    fn test_smoothing_carries_across_cycles() {
        let settings = Settings::default();
        let pipeline = ThrottlePipeline::default();
        let mut state = CalibrationState::seeded(512);

        // 0.75 * 900 + 0.25 * 512 = 803
        let first = pipeline.update(900, &settings, &mut state);
        assert_eq!(state.smoothed(), Some(803));
        // (803 - 512) * 511 / 388 + 512 = 895
        assert_eq!(first, 895);

        // 0.75 * 900 + 0.25 * 803 = 875.75
        pipeline.update(900, &settings, &mut state);
        assert_eq!(state.smoothed(), Some(875));

        let mut settled = 0;
        for _ in 0..10 {
            settled = pipeline.update(900, &settings, &mut state);
        }
        assert!(settled >= OUTPUT_MAX - 3, "settled at {}", settled);
    }

    #[test]
    fn test_same_input_same_state_same_output() {
        let settings = Settings::default();
        let pipeline = ThrottlePipeline::default();

        let mut a = CalibrationState::seeded(300);
        let mut b = CalibrationState::seeded(300);
        assert_eq!(
            pipeline.update(700, &settings, &mut a),
            pipeline.update(700, &settings, &mut b)
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_uses_store_calibration() {
        let mut settings = Settings::default();
        settings.set(SettingKey::ThrottleMin, 200);
        settings.set(SettingKey::ThrottleCenter, 450);
        settings.set(SettingKey::ThrottleMax, 700);
        settings.set(SettingKey::Deadzone, 0);

        let pipeline = ThrottlePipeline::default();
        let mut state = CalibrationState::seeded(450);
        assert_eq!(pipeline.update(450, &settings, &mut state), OUTPUT_CENTER);

        let mut state = CalibrationState::seeded(200);
        assert_eq!(pipeline.update(200, &settings, &mut state), OUTPUT_MIN);

        // Without a deadzone small offsets pass through
        let mut state = CalibrationState::seeded(451);
        assert_eq!(pipeline.update(451, &settings, &mut state), 514);
    }

    #[test]
    fn test_unsmoothed_pipeline() {
        let settings = Settings::default();
        let pipeline = ThrottlePipeline {
            smoothing: SmoothingFactor::NONE,
            ..ThrottlePipeline::default()
        };
        let mut state = CalibrationState::seeded(100);
        assert_eq!(pipeline.update(900, &settings, &mut state), OUTPUT_MAX);
    }
}
