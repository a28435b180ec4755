// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Glove sensor front-end.
//!
//! Combines the three flex sensors (one ADC channel each) with the hand-mounted MPU-6050 into a
//! single [`SensorAdapter`].
//!
//! `ReadFlex` is a closure returning the raw reading of a flex sensor on the 16-bit scale the
//! calibration constants are expressed in. On a 12-bit converter, pass readings through
//! [`widen_adc12`].

use embedded_hal::i2c::I2c;

use crate::drivers::{FlexSensor, Mpu6050, Orientation, SensorAdapter};

/// Stretch a 12-bit conversion onto the full 16-bit range, repeating the top bits in the gap so
/// 0xFFF maps to 0xFFFF.
#[inline]
pub fn widen_adc12(raw: u16) -> u16 {
    let raw = raw & 0x0FFF;
    (raw << 4) | (raw >> 8)
}

pub struct GloveSensors<ReadFlex, I> {
    read_flex: ReadFlex,
    imu: Mpu6050<I>,
}

impl<ReadFlex, I> GloveSensors<ReadFlex, I>
where
    ReadFlex: FnMut(FlexSensor) -> u16,
    I: I2c,
{
    /// Wake the accelerometer and take ownership of the flex readers.
    pub fn new(read_flex: ReadFlex, mut imu: Mpu6050<I>) -> Result<Self, I::Error> {
        imu.wake()?;
        Ok(Self { read_flex, imu })
    }

    pub fn imu(&mut self) -> &mut Mpu6050<I> {
        &mut self.imu
    }

    pub fn free(self) -> (ReadFlex, Mpu6050<I>) {
        (self.read_flex, self.imu)
    }
}

impl<ReadFlex, I> SensorAdapter for GloveSensors<ReadFlex, I>
where
    ReadFlex: FnMut(FlexSensor) -> u16,
    I: I2c,
{
    type Error = I::Error;

    #[inline]
    fn read_raw(&mut self, sensor: FlexSensor) -> Result<u16, Self::Error> {
        Ok((self.read_flex)(sensor))
    }

    #[inline]
    fn read_orientation(&mut self) -> Result<Orientation, Self::Error> {
        self.imu.read_orientation()
    }
}
