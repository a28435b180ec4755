// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Peripheral Adapters
//!
//! This module defines the two narrow interfaces the control loop consumes, and the device-level
//! drivers that implement them on top of `embedded-hal` traits.
//!
//! ## Interfaces
//!
//! - [`SensorAdapter`] – raw flex readings and accelerometer pitch/roll
//! - [`ActuatorAdapter`] – servo pulse-width output
//!
//! ## Existing drivers
//!
//! - [`mpu6050`] – InvenSense MPU-6050 accelerometer over I2C
//! - [`glove`] – glove front-end: three flex sensors on ADC channels plus the MPU-6050
//! - [`servo`] – hobby servos on PWM channels

pub mod glove;
pub mod mpu6050;
pub mod servo;

pub use glove::GloveSensors;
pub use mpu6050::{Acceleration, Mpu6050, Orientation};
pub use servo::ServoBank;

use crate::joint::ServoId;

/// Flex sensors sewn into the glove.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlexSensor {
    Shoulder,
    Elbow,
    Grip,
}

impl FlexSensor {
    pub const COUNT: usize = 3;

    /// Acquisition order within a cycle.
    pub const ALL: [FlexSensor; FlexSensor::COUNT] =
        [FlexSensor::Shoulder, FlexSensor::Elbow, FlexSensor::Grip];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Everything read from the glove in one cycle, treated as a single sample instant.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct GloveSample {
    pub flex: [u16; FlexSensor::COUNT],
    pub orientation: Orientation,
}

impl GloveSample {
    #[inline]
    pub fn flex(&self, sensor: FlexSensor) -> u16 {
        self.flex[sensor.index()]
    }
}

/// Source of raw glove readings.
pub trait SensorAdapter {
    type Error;

    /// Raw reading of one flex sensor, on a 16-bit scale.
    fn read_raw(&mut self, sensor: FlexSensor) -> Result<u16, Self::Error>;

    /// Hand pitch and roll in degrees.
    fn read_orientation(&mut self) -> Result<Orientation, Self::Error>;
}

/// Sink for servo commands.
pub trait ActuatorAdapter {
    type Error;

    fn set_pulse_width(&mut self, servo: ServoId, pulse_ms: f32) -> Result<(), Self::Error>;
}

impl<T: SensorAdapter + ?Sized> SensorAdapter for &mut T {
    type Error = T::Error;

    #[inline]
    fn read_raw(&mut self, sensor: FlexSensor) -> Result<u16, Self::Error> {
        T::read_raw(self, sensor)
    }

    #[inline]
    fn read_orientation(&mut self) -> Result<Orientation, Self::Error> {
        T::read_orientation(self)
    }
}

impl<T: ActuatorAdapter + ?Sized> ActuatorAdapter for &mut T {
    type Error = T::Error;

    #[inline]
    fn set_pulse_width(&mut self, servo: ServoId, pulse_ms: f32) -> Result<(), Self::Error> {
        T::set_pulse_width(self, servo, pulse_ms)
    }
}
