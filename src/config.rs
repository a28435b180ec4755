// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Per-joint tuning.
//!
//! All calibration constants live here so tuning a channel never touches control flow. Start from
//! [`ArmConfig::DEFAULT`] and override single joints with [`ArmConfig::with_joint`]:
//!
//! ```ignore
//! let config = ArmConfig::DEFAULT.with_joint(
//!     Joint::HandGrip,
//!     ArmConfig::DEFAULT.joint(Joint::HandGrip).with_policy(FilterPolicy::STANDARD),
//! );
//! config.validate()?;
//! ```

use crate::control::calibration::{
    apply_floor, CalibrationCurve, DeadBandCurve, TiltCurve, TwoPointCurve, MAX_ANGLE_DEG,
    MIN_ANGLE_DEG,
};
use crate::control::motion_filter::{FilterPolicy, Mounting};
use crate::drivers::{FlexSensor, GloveSample};
use crate::error::ConfigError;
use crate::joint::{Joint, JointAngles, ServoId};

/// Shoulder flex sensor: flat between 2384 and 2520, full bend at 5000.
pub const SHOULDER_CURVE: DeadBandCurve = DeadBandCurve::new(2384.0, 2520.0, 5000.0, 180.0);

/// Elbow and grip flex sensors.
pub const FLEX_CURVE: TwoPointCurve = TwoPointCurve::new(280.0, 4000.0);

/// Wrist tilt: readings in (0, 2)° are noise, neutral pose at 90°.
pub const WRIST_CURVE: TiltCurve = TiltCurve::new(2.0, 90.0);

/// The elbow never folds past a right angle.
pub const ELBOW_FLOOR_DEG: f32 = 90.0;

/// Where a joint's input comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignalSource {
    Flex(FlexSensor),
    Pitch,
    Roll,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JointConfig {
    pub servo: ServoId,
    pub source: SignalSource,
    pub curve: CalibrationCurve,
    /// Lower bound applied after the curve.
    pub floor_deg: f32,
    pub policy: FilterPolicy,
    pub mounting: Mounting,
}

impl JointConfig {
    /// Direct-mounted joint with the standard dead zone and no floor.
    pub const fn new(servo: ServoId, source: SignalSource, curve: CalibrationCurve) -> Self {
        Self {
            servo,
            source,
            curve,
            floor_deg: MIN_ANGLE_DEG,
            policy: FilterPolicy::STANDARD,
            mounting: Mounting::Direct,
        }
    }

    pub const fn with_floor(mut self, floor_deg: f32) -> Self {
        self.floor_deg = floor_deg;
        self
    }

    pub const fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub const fn with_mounting(mut self, mounting: Mounting) -> Self {
        self.mounting = mounting;
        self
    }

    /// The value this joint calibrates from.
    pub fn input(&self, sample: &GloveSample) -> f32 {
        match self.source {
            SignalSource::Flex(sensor) => f32::from(sample.flex(sensor)),
            SignalSource::Pitch => sample.orientation.pitch_deg,
            SignalSource::Roll => sample.orientation.roll_deg,
        }
    }

    /// Joint angle for `sample`, floor included.
    #[inline]
    pub fn calibrate(&self, sample: &GloveSample) -> f32 {
        apply_floor(self.curve.angle(self.input(sample)), self.floor_deg)
    }

    pub fn validate(&self, joint: Joint) -> Result<(), ConfigError> {
        match self.curve {
            CalibrationCurve::DeadBand(c) => {
                if !(c.zero_min <= c.zero_max) {
                    return Err(ConfigError::InvertedDeadBand(joint));
                }
                if !(c.zero_max < c.full_scale) {
                    return Err(ConfigError::DeadBandAtFullScale(joint));
                }
            }
            CalibrationCurve::TwoPoint(c) => {
                if c.raw_at_0 == c.raw_at_180 {
                    return Err(ConfigError::DegenerateTwoPoint(joint));
                }
            }
            CalibrationCurve::Tilt(_) => {}
        }

        if let FilterPolicy::DeadZone { threshold_deg } = self.policy {
            if !(threshold_deg >= 0.0) {
                return Err(ConfigError::InvalidDeadZone(joint));
            }
        }

        if !(MIN_ANGLE_DEG..=MAX_ANGLE_DEG).contains(&self.floor_deg) {
            return Err(ConfigError::FloorOutOfRange(joint));
        }

        Ok(())
    }
}

/// Configuration of all five joints, indexed by [`Joint`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArmConfig {
    joints: [JointConfig; Joint::COUNT],
}

impl ArmConfig {
    pub const DEFAULT: ArmConfig = ArmConfig {
        joints: [
            // ShoulderUpDown
            JointConfig::new(
                ServoId(17),
                SignalSource::Flex(FlexSensor::Shoulder),
                CalibrationCurve::DeadBand(SHOULDER_CURVE),
            ),
            // ElbowUpDown: servo mounted mirrored
            JointConfig::new(
                ServoId(18),
                SignalSource::Flex(FlexSensor::Elbow),
                CalibrationCurve::TwoPoint(FLEX_CURVE),
            )
            .with_floor(ELBOW_FLOOR_DEG)
            .with_mounting(Mounting::Mirrored),
            // HandUpDown
            JointConfig::new(
                ServoId(19),
                SignalSource::Pitch,
                CalibrationCurve::Tilt(WRIST_CURVE),
            ),
            // HandRotation
            JointConfig::new(
                ServoId(20),
                SignalSource::Roll,
                CalibrationCurve::Tilt(WRIST_CURVE.reversed()),
            ),
            // HandGrip: re-commanded on any change
            JointConfig::new(
                ServoId(21),
                SignalSource::Flex(FlexSensor::Grip),
                CalibrationCurve::TwoPoint(FLEX_CURVE),
            )
            .with_policy(FilterPolicy::AnyChange),
        ],
    };

    #[inline]
    pub fn joint(&self, joint: Joint) -> &JointConfig {
        &self.joints[joint.index()]
    }

    pub fn with_joint(mut self, joint: Joint, config: JointConfig) -> Self {
        self.joints[joint.index()] = config;
        self
    }

    /// Calibrate every joint from one sample.
    pub fn calibrate(&self, sample: &GloveSample) -> JointAngles {
        let mut angles = JointAngles::default();
        for joint in Joint::ALL {
            angles[joint] = self.joint(joint).calibrate(sample);
        }
        angles
    }

    /// Check every joint, reporting the first problem found in actuation order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for joint in Joint::ALL {
            self.joint(joint).validate(joint)?;
        }
        Ok(())
    }
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
