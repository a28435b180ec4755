// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Signal-to-angle calibration curves.
//!
//! Every curve is a pure function from a sensor value to a joint angle in degrees. Whatever the
//! input, the output is clamped to [`MIN_ANGLE_DEG`, `MAX_ANGLE_DEG`].
//!
//! | Curve | Sensor |
//! | ----- | ------ |
//! | [`DeadBandCurve`] | Flex sensor with a flat, unflexed rest region |
//! | [`TwoPointCurve`] | Generic flex sensor, linear between two anchors |
//! | [`TiltCurve`] | Accelerometer pitch/roll, re-centred on the horizontal |

pub const MIN_ANGLE_DEG: f32 = 0.0;
pub const MAX_ANGLE_DEG: f32 = 180.0;

/// Clamp an angle into the servo range. NaN maps to 0.
#[inline]
pub fn clamp_angle(angle: f32) -> f32 {
    if angle.is_nan() {
        return MIN_ANGLE_DEG;
    }
    angle.clamp(MIN_ANGLE_DEG, MAX_ANGLE_DEG)
}

/// Threshold-linear curve with a dead-band at rest.
///
/// Readings inside `[zero_min, zero_max]` map to 0. Above the window the angle rises linearly,
/// reaching `max_angle` at `full_scale`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DeadBandCurve {
    pub zero_min: f32,
    pub zero_max: f32,
    pub full_scale: f32,
    pub max_angle: f32,
}

impl DeadBandCurve {
    pub const fn new(zero_min: f32, zero_max: f32, full_scale: f32, max_angle: f32) -> Self {
        Self {
            zero_min,
            zero_max,
            full_scale,
            max_angle,
        }
    }

    #[inline]
    pub fn contains(&self, raw: f32) -> bool {
        self.zero_min <= raw && raw <= self.zero_max
    }

    pub fn angle(&self, raw: f32) -> f32 {
        if self.contains(raw) {
            return MIN_ANGLE_DEG;
        }

        let slope = self.max_angle / (self.full_scale - self.zero_max);
        clamp_angle((raw - self.zero_max) * slope)
    }
}

/// Linear curve through `(raw_at_0, 0°)` and `(raw_at_180, 180°)`, extrapolated then clamped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TwoPointCurve {
    pub raw_at_0: f32,
    pub raw_at_180: f32,
}

impl TwoPointCurve {
    pub const fn new(raw_at_0: f32, raw_at_180: f32) -> Self {
        Self {
            raw_at_0,
            raw_at_180,
        }
    }

    pub fn angle(&self, raw: f32) -> f32 {
        let slope = MAX_ANGLE_DEG / (self.raw_at_180 - self.raw_at_0);
        clamp_angle((raw - self.raw_at_0) * slope)
    }

    /// Raw value that calibrates to `angle` degrees.
    pub fn raw_for(&self, angle: f32) -> f32 {
        self.raw_at_0 + angle / MAX_ANGLE_DEG * (self.raw_at_180 - self.raw_at_0)
    }
}

/// Accelerometer tilt curve.
///
/// Small positive readings in `(0, snap_below)` are treated as sensor noise and snapped to 0, then
/// `offset` moves the neutral pose to the middle of the servo range. A `reversed` curve reports
/// `180 - angle` for sensors mounted against the joint's direction of travel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TiltCurve {
    pub snap_below: f32,
    pub offset: f32,
    pub reversed: bool,
}

impl TiltCurve {
    pub const fn new(snap_below: f32, offset: f32) -> Self {
        Self {
            snap_below,
            offset,
            reversed: false,
        }
    }

    pub const fn reversed(mut self) -> Self {
        self.reversed = !self.reversed;
        self
    }

    pub fn angle(&self, tilt_deg: f32) -> f32 {
        let tilt = if tilt_deg > 0.0 && tilt_deg < self.snap_below {
            0.0
        } else {
            tilt_deg
        };

        let angle = clamp_angle(tilt + self.offset);
        if self.reversed {
            MAX_ANGLE_DEG - angle
        } else {
            angle
        }
    }
}

/// Calibration curve selected per joint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CalibrationCurve {
    DeadBand(DeadBandCurve),
    TwoPoint(TwoPointCurve),
    Tilt(TiltCurve),
}

impl CalibrationCurve {
    #[inline]
    pub fn angle(&self, input: f32) -> f32 {
        match self {
            CalibrationCurve::DeadBand(curve) => curve.angle(input),
            CalibrationCurve::TwoPoint(curve) => curve.angle(input),
            CalibrationCurve::Tilt(curve) => curve.angle(input),
        }
    }
}

/// Apply a hard lower bound after calibration. The result stays inside the servo range.
#[inline]
pub fn apply_floor(angle: f32, floor_deg: f32) -> f32 {
    clamp_angle(clamp_angle(angle).max(floor_deg))
}
