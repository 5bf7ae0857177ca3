//! Firefly Hardware Abstraction Layer
//!
//! This crate defines the boundary between the remote's board-agnostic core
//! and the chip-specific drivers that own the actual peripherals. The core
//! only ever talks to hardware through these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  firefly-core (settings, throttle)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  firefly-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ EEPROM / NVM  │       │  ADC channel  │
//! │    driver     │       │    driver     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`storage::NvStorage`] - Byte-addressable non-volatile storage
//! - [`analog::AnalogInput`] - 10-bit analog channel (hall sensor, battery)

#![no_std]
#![deny(unsafe_code)]

pub mod analog;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use analog::{AnalogInput, ADC_MAX};
pub use storage::{NvStorage, RamStorage, StorageError};
