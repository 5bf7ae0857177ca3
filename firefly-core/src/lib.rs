//! Board-agnostic core logic for the Firefly remote firmware
//!
//! This crate contains the parts of the remote that do not depend on a
//! specific board:
//!
//! - Persistent settings (rule table, validated block, load/save/reset)
//! - Sample averaging and exponential smoothing
//! - Throttle calibration (two-segment remap, deadzone)
//! - Battery gauge for the remote's own cell
//!
//! Display, menus, radio framing and raw peripheral access live elsewhere
//! and consume this crate through [`settings::SettingsStore`] and
//! [`throttle::ThrottlePipeline`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod battery;
pub mod filter;
pub mod settings;
pub mod throttle;
