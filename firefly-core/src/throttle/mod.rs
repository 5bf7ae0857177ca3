//! Throttle calibration
//!
//! Turns hall sensor readings into the throttle command sent to the board:
//!
//! ```text
//! sample ──▶ smooth ──▶ calibrate ──▶ deadzone ──▶ 0..=1023
//!              ▲            ▲            ▲
//!        CalibrationState   └─ Settings ─┘
//! ```

pub mod mapping;
pub mod pipeline;

pub use mapping::{apply_deadzone, calibrate, remap, Endpoints, OutputRange};
pub use pipeline::{compute_throttle, CalibrationState, ThrottlePipeline};

/// Full brake
pub const OUTPUT_MIN: u16 = 0;

/// Neutral
pub const OUTPUT_CENTER: u16 = 512;

/// Full throttle
pub const OUTPUT_MAX: u16 = 1023;
