// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! This module turns glove readings into servo commands.
//!
//! ## Modules
//!
//! - [`calibration`] - Sensor-to-angle curves, all clamped to the servo range.
//! - [`motion_filter`] - Per-joint hysteresis deciding when a servo is re-commanded.
//! - [`scheduler`] - Fixed-order, paced actuation loop.

pub mod calibration;
pub mod motion_filter;
pub mod scheduler;

pub use calibration::CalibrationCurve;
pub use motion_filter::{FilterPolicy, FilterState, Mounting, ServoCommand};
pub use scheduler::{ActuationScheduler, CycleReport, ACTUATION_SCHEDULE};
