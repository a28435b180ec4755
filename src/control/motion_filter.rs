// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hysteresis filter deciding when a joint gets a new servo command.
//!
//! The decision is taken on the calibrated angle. Mounting correction is applied afterwards, to the
//! command and to what gets stored, so the stored angle is always a shaft angle. The stored angle
//! only moves when a command is actually issued, so slow drift below the dead zone is never
//! committed.

use crate::config::JointConfig;
use crate::control::calibration::{clamp_angle, MAX_ANGLE_DEG};
use crate::drivers::servo::pulse_width_ms;
use crate::joint::{Joint, JointAngles, ServoId};

/// Minimum change (degrees) before a standard joint is re-commanded.
pub const DEAD_ZONE_DEGREES: f32 = 8.0;

/// Decision rule for re-commanding a joint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FilterPolicy {
    /// Command when the change exceeds `threshold_deg`, or when the new angle is 0 (home).
    DeadZone { threshold_deg: f32 },

    /// Command on any change at all.
    AnyChange,
}

impl FilterPolicy {
    pub const STANDARD: FilterPolicy = FilterPolicy::DeadZone {
        threshold_deg: DEAD_ZONE_DEGREES,
    };

    /// Returns true if moving from `last_deg` to `new_deg` warrants a command.
    pub fn admits(&self, new_deg: f32, last_deg: f32) -> bool {
        let delta = new_deg - last_deg;
        match *self {
            FilterPolicy::DeadZone { threshold_deg } => {
                delta > threshold_deg || delta < -threshold_deg || new_deg == 0.0
            }
            FilterPolicy::AnyChange => delta != 0.0,
        }
    }
}

/// How a servo is mounted relative to the joint it drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mounting {
    Direct,
    /// Servo faces the other way; 0° on the joint is 180° on the shaft.
    Mirrored,
}

impl Mounting {
    #[inline]
    pub fn apply(self, angle_deg: f32) -> f32 {
        match self {
            Mounting::Direct => angle_deg,
            Mounting::Mirrored => MAX_ANGLE_DEG - angle_deg,
        }
    }
}

/// A filtered command ready for the actuator adapter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ServoCommand {
    pub joint: Joint,
    pub servo: ServoId,
    /// Shaft angle after mounting correction.
    pub angle_deg: f32,
    pub pulse_ms: f32,
}

/// Last commanded shaft angle per joint. Starts at 0 for every joint.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct FilterState {
    last_commanded: JointAngles,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn last(&self, joint: Joint) -> f32 {
        self.last_commanded[joint]
    }

    /// Record a command that was delivered to the actuator.
    #[inline]
    pub fn commit(&mut self, command: &ServoCommand) {
        self.last_commanded[command.joint] = command.angle_deg;
    }
}

/// Decide whether `calibrated_deg` produces a command for `joint`.
///
/// Does not touch `state`; the caller commits the returned command once the actuator accepted it.
pub fn plan(
    joint: Joint,
    config: &JointConfig,
    calibrated_deg: f32,
    state: &FilterState,
) -> Option<ServoCommand> {
    let calibrated_deg = clamp_angle(calibrated_deg);
    // Mounting is its own inverse; the delta keeps its magnitude.
    let last_calibrated = config.mounting.apply(state.last(joint));

    if !config.policy.admits(calibrated_deg, last_calibrated) {
        return None;
    }

    let target = config.mounting.apply(calibrated_deg);
    Some(ServoCommand {
        joint,
        servo: config.servo,
        angle_deg: target,
        pulse_ms: pulse_width_ms(target),
    })
}
