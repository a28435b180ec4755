// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! InvenSense MPU-6050 accelerometer over I2C.
//!
//! Only the accelerometer is used. The device powers up asleep; call [`Mpu6050::wake`] once before
//! reading. Readings assume the power-on full scale of ±2 g.
//!
//! Example:
//! ```ignore
//! let mut imu = Mpu6050::new(i2c);
//! imu.wake()?;
//! let tilt = imu.read_orientation()?;
//! ```

use core::f32::consts::PI;

use embedded_hal::i2c::I2c;
use micromath::F32;

/// Address with AD0 tied low.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Expected `WHO_AM_I` contents.
pub const DEVICE_ID: u8 = 0x68;

// Register addresses
pub mod reg {
    pub const ACCEL_CONFIG: u8 = 0x1C;
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const WHO_AM_I: u8 = 0x75;
}

/// Counts per g at ±2 g full scale.
const COUNTS_PER_G: f32 = 16384.0;

const RAD_TO_DEG: f32 = 180.0 / PI;

/// Acceleration in g.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    /// Decode the six big-endian bytes starting at `ACCEL_XOUT_H`.
    pub fn from_registers(raw: [u8; 6]) -> Self {
        let axis = |hi: u8, lo: u8| f32::from(i16::from_be_bytes([hi, lo])) / COUNTS_PER_G;
        Self {
            x: axis(raw[0], raw[1]),
            y: axis(raw[2], raw[3]),
            z: axis(raw[4], raw[5]),
        }
    }
}

/// Hand tilt in degrees, signed.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Orientation {
    pub pitch_deg: f32,
    pub roll_deg: f32,
}

impl Orientation {
    pub const fn new(pitch_deg: f32, roll_deg: f32) -> Self {
        Self {
            pitch_deg,
            roll_deg,
        }
    }

    /// Static tilt from the gravity vector.
    ///
    /// pitch = atan2(y, √(x² + z²)), roll = atan2(x, √(y² + z²))
    pub fn from_acceleration(a: Acceleration) -> Self {
        let pitch = F32(a.y).atan2(F32(a.x * a.x + a.z * a.z).sqrt());
        let roll = F32(a.x).atan2(F32(a.y * a.y + a.z * a.z).sqrt());

        Self {
            pitch_deg: pitch.0 * RAD_TO_DEG,
            roll_deg: roll.0 * RAD_TO_DEG,
        }
    }
}

pub struct Mpu6050<I> {
    bus: I,
    address: u8,
}

impl<I: I2c> Mpu6050<I> {
    pub fn new(bus: I) -> Self {
        Self::with_address(bus, DEFAULT_ADDRESS)
    }

    /// Use the alternate address (AD0 high is `0x69`).
    pub fn with_address(bus: I, address: u8) -> Self {
        Self { bus, address }
    }

    pub fn release(self) -> I {
        self.bus
    }

    fn read_register(&mut self, register: u8) -> Result<u8, I::Error> {
        let mut buf = [0u8; 1];
        self.bus.write_read(self.address, &[register], &mut buf)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), I::Error> {
        self.bus.write(self.address, &[register, value])
    }

    pub fn who_am_i(&mut self) -> Result<u8, I::Error> {
        self.read_register(reg::WHO_AM_I)
    }

    /// Clear the sleep bit and select the internal oscillator.
    pub fn wake(&mut self) -> Result<(), I::Error> {
        self.write_register(reg::PWR_MGMT_1, 0x00)
    }

    pub fn read_acceleration(&mut self) -> Result<Acceleration, I::Error> {
        let mut raw = [0u8; 6];
        self.bus
            .write_read(self.address, &[reg::ACCEL_XOUT_H], &mut raw)?;
        Ok(Acceleration::from_registers(raw))
    }

    #[inline]
    pub fn read_orientation(&mut self) -> Result<Orientation, I::Error> {
        Ok(Orientation::from_acceleration(self.read_acceleration()?))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Register-file stand-in for an I2C device. Writes set the register pointer (first byte) and
    /// store any following bytes; reads stream from the pointer.
    pub(crate) struct FakeRegisters {
        pub regs: [u8; 128],
        pub writes: Vec<(u8, Vec<u8>)>,
        pub fail: bool,
        pointer: usize,
    }

    impl FakeRegisters {
        pub fn new() -> Self {
            let mut regs = [0u8; 128];
            regs[reg::WHO_AM_I as usize] = DEVICE_ID;
            regs[reg::PWR_MGMT_1 as usize] = 1 << 6;
            Self {
                regs,
                writes: Vec::new(),
                fail: false,
                pointer: 0,
            }
        }

        pub fn with_accel(mut self, x: i16, y: i16, z: i16) -> Self {
            let start = reg::ACCEL_XOUT_H as usize;
            for (i, axis) in [x, y, z].iter().enumerate() {
                let [hi, lo] = axis.to_be_bytes();
                self.regs[start + 2 * i] = hi;
                self.regs[start + 2 * i + 1] = lo;
            }
            self
        }
    }

    impl ErrorType for FakeRegisters {
        type Error = ErrorKind;
    }

    impl I2c for FakeRegisters {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Bus);
            }
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => {
                        self.writes.push((address, bytes.to_vec()));
                        if let Some((&register, data)) = bytes.split_first() {
                            self.pointer = register as usize;
                            for (i, &b) in data.iter().enumerate() {
                                self.regs[self.pointer + i] = b;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for (i, b) in buf.iter_mut().enumerate() {
                            *b = self.regs[self.pointer + i];
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn wake_clears_sleep_bit() {
        let mut imu = Mpu6050::new(FakeRegisters::new());
        imu.wake().unwrap();

        let bus = imu.release();
        assert_eq!(bus.writes, vec![(DEFAULT_ADDRESS, vec![reg::PWR_MGMT_1, 0x00])]);
        assert_eq!(bus.regs[reg::PWR_MGMT_1 as usize], 0x00);
    }

    #[test]
    fn identifies_device() {
        let mut imu = Mpu6050::new(FakeRegisters::new());
        assert_eq!(imu.who_am_i().unwrap(), DEVICE_ID);
    }

    #[test]
    fn decodes_big_endian_acceleration() {
        let mut imu = Mpu6050::new(FakeRegisters::new().with_accel(-8192, 4096, 16384));
        let a = imu.read_acceleration().unwrap();

        assert_eq!(a, Acceleration { x: -0.5, y: 0.25, z: 1.0 });
    }

    #[test]
    fn level_hand_has_no_tilt() {
        let tilt = Orientation::from_acceleration(Acceleration { x: 0.0, y: 0.0, z: 1.0 });
        assert_abs_diff_eq!(tilt.pitch_deg, 0.0, epsilon = 0.5);
        assert_abs_diff_eq!(tilt.roll_deg, 0.0, epsilon = 0.5);
    }

    #[test]
    fn pitch_and_roll_follow_gravity() {
        let pitched = Orientation::from_acceleration(Acceleration { x: 0.0, y: 1.0, z: 1.0 });
        assert_abs_diff_eq!(pitched.pitch_deg, 45.0, epsilon = 0.5);
        assert_abs_diff_eq!(pitched.roll_deg, 0.0, epsilon = 0.5);

        let rolled = Orientation::from_acceleration(Acceleration { x: -1.0, y: 0.0, z: 0.0 });
        assert_abs_diff_eq!(rolled.roll_deg, -90.0, epsilon = 0.5);
    }

    #[test]
    fn bus_errors_propagate() {
        let mut bus = FakeRegisters::new();
        bus.fail = true;
        let mut imu = Mpu6050::new(bus);
        assert_eq!(imu.read_orientation(), Err(ErrorKind::Bus));
    }
}
