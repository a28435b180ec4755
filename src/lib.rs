// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Glove Arm Firmware
//!
//! This crate drives a five-joint robotic arm from a sensor glove: flex sensors and a hand-mounted
//! accelerometer are sampled, calibrated into joint angles, filtered against jitter, and sent to
//! hobby servos on a fixed cadence. Written in Rust, targeting an STM32F777 MCU.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`joint`] | Joint channels, servo ids, per-joint angle records |
//! | [`config`] | Per-joint calibration and filter tuning |
//! | [`control`] | Calibration curves, motion filter, actuation scheduler |
//! | [`drivers`] | Adapter traits and device drivers (MPU-6050, servos, glove front-end) |
//! | [`error`] | Configuration errors and peripheral faults |
//! | `hw` | MCU-level wrappers for ADC, PWM timers, I2C, USART (feature `firmware`) |
//!
//! ## Getting Started
//!
//! Run the host-side tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features firmware --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod joint;

#[cfg(feature = "firmware")]
pub mod hw;

pub use config::ArmConfig;
pub use error::{ConfigError, Fault};
pub use joint::{Joint, JointAngles, ServoId};
