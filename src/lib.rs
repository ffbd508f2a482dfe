#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`AcquisitionState`**: Latest and previous knob and button readings plus the sweep cursor
//! - **`poll`**: Advances the sweep by exactly one expander transaction
//! - **`Config`**: Pin assignment and smoothing factor, fixed at startup
//! - **`Expander`**: Trait to implement for your expander hardware
//! - **`Seesaw`**: Ready-made `Expander` for seesaw chips over `embedded-hal` I2C
//! - **`colorwheel`**: Byte position to saturated color, used for knob LED feedback
//!
//! Knob values are the raw analog readings after exponential smoothing. Buttons
//! are active-low and only reachable through the `is_pressed`, `was_pressed`,
//! `just_pressed` and `just_released` predicates.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

#[macro_use]
mod fmt;

pub mod acquisition;
pub mod buttons;
pub mod colors;
pub mod config;
pub mod hardware;
pub mod knob;
pub mod seesaw;

pub use acquisition::{AcquisitionState, ChannelError, PollError, PollEvent, Snapshot};
pub use colors::{Rgb24, colorwheel};
pub use config::{Config, ConfigError};
pub use hardware::Expander;
pub use knob::KnobChannel;
pub use seesaw::{ColorOrder, ProductInfo, Seesaw, SeesawError};

/// LED color for a knob that has not been read yet.
pub const COLOR_OFF: Rgb24 = Srgb::new(0, 0, 0);
