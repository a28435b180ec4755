// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types for the control loop.
//!
//! Out-of-range readings are never errors; calibration clamps them. What remains is configuration
//! that cannot calibrate, and peripheral failures, which end the control loop.

use core::fmt;

use crate::joint::Joint;

/// Configuration rejected by [`ArmConfig::validate`](crate::config::ArmConfig::validate).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Both two-point anchors are the same raw value.
    DegenerateTwoPoint(Joint),
    /// Dead-band lower bound above its upper bound.
    InvertedDeadBand(Joint),
    /// Dead-band reaches full scale, leaving no slope.
    DeadBandAtFullScale(Joint),
    /// Dead-zone threshold is negative or NaN.
    InvalidDeadZone(Joint),
    /// Floor outside [0, 180].
    FloorOutOfRange(Joint),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DegenerateTwoPoint(j) => write!(f, "{}: two-point anchors coincide", j),
            ConfigError::InvertedDeadBand(j) => write!(f, "{}: dead-band bounds inverted", j),
            ConfigError::DeadBandAtFullScale(j) => {
                write!(f, "{}: dead-band reaches full scale", j)
            }
            ConfigError::InvalidDeadZone(j) => write!(f, "{}: invalid dead-zone threshold", j),
            ConfigError::FloorOutOfRange(j) => write!(f, "{}: floor outside 0..=180", j),
        }
    }
}

/// Peripheral failure that stopped a control cycle.
///
/// `SE` is the sensor adapter's error, `AE` the actuator adapter's.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fault<SE, AE> {
    Sensor(SE),
    Actuator { joint: Joint, error: AE },
}

impl<SE: fmt::Debug, AE: fmt::Debug> fmt::Display for Fault<SE, AE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Sensor(e) => write!(f, "sensor fault: {:?}", e),
            Fault::Actuator { joint, error } => write!(f, "actuator fault on {}: {:?}", joint, error),
        }
    }
}
