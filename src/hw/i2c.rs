// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Inter-Integrated Circuit (I2C) abstraction layer.
//!
//! `I2cBus` wraps the HAL's blocking I2C1 master and exposes it as `embedded_hal::i2c::I2c`, so
//! device drivers stay board-independent. Bus timing is derived from the frozen clocks.
//!
//! The HAL times out through the DWT cycle counter; enable it before building the bus:
//! ```ignore
//! cp.DCB.enable_trace();
//! cp.DWT.enable_cycle_counter();
//! let bus = I2cBus::i2c1(dp.I2C1, pins.i2c1, &clocks, &mut rcc.apb1);
//! let mut imu = Mpu6050::new(bus);
//! ```

use core::fmt;

use embedded_hal::i2c::{self, ErrorKind, NoAcknowledgeSource, Operation, SevenBitAddress};
use nb::Error as NbError;
use stm32f7xx_hal::{
    i2c::{BlockingI2c, Error as HalError, Mode},
    pac,
    prelude::*,
    rcc::{Clocks, APB1},
};

use super::pins::{I2c1Pins, I2c1Scl, I2c1Sda};

/// Standard-mode SCL rate.
pub const BUS_HZ: u32 = 100_000;

/// Longest wait for any single flag.
const DATA_TIMEOUT_US: u32 = 10_000;

/// The transfer size register is 8 bits wide.
const MAX_TRANSFER: usize = 255;

fn check_len(len: usize) -> Result<(), I2cError> {
    if (1..=MAX_TRANSFER).contains(&len) {
        Ok(())
    } else {
        Err(I2cError::Length)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum I2cError {
    Bus,
    Arbitration,
    /// Address or data byte not acknowledged.
    Nack,
    Overrun,
    Busy,
    Timeout,
    /// Operation outside 1..=255 bytes, which one hardware transfer cannot frame.
    Length,
}

impl From<NbError<HalError>> for I2cError {
    fn from(e: NbError<HalError>) -> Self {
        match e {
            NbError::WouldBlock => I2cError::Timeout,
            NbError::Other(HalError::Bus) => I2cError::Bus,
            NbError::Other(HalError::Arbitration) => I2cError::Arbitration,
            NbError::Other(HalError::Acknowledge) => I2cError::Nack,
            NbError::Other(HalError::Busy) => I2cError::Busy,
            NbError::Other(_) => I2cError::Overrun,
        }
    }
}

impl fmt::Display for I2cError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            I2cError::Bus => write!(f, "bus error"),
            I2cError::Arbitration => write!(f, "arbitration lost"),
            I2cError::Nack => write!(f, "no acknowledge"),
            I2cError::Overrun => write!(f, "overrun"),
            I2cError::Busy => write!(f, "bus busy"),
            I2cError::Timeout => write!(f, "timeout"),
            I2cError::Length => write!(f, "transfer length out of range"),
        }
    }
}

impl i2c::Error for I2cError {
    fn kind(&self) -> ErrorKind {
        match self {
            I2cError::Bus => ErrorKind::Bus,
            I2cError::Arbitration => ErrorKind::ArbitrationLoss,
            I2cError::Nack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            I2cError::Overrun => ErrorKind::Overrun,
            I2cError::Busy | I2cError::Timeout | I2cError::Length => ErrorKind::Other,
        }
    }
}

/// Wrapper around the blocking HAL I2C1 master on the MPU-6050 pins.
pub struct I2cBus {
    i2c: BlockingI2c<pac::I2C1, I2c1Scl, I2c1Sda>,
}

impl I2cBus {
    /// Standard mode at [`BUS_HZ`].
    pub fn i2c1(i2c1: pac::I2C1, pins: I2c1Pins, clocks: &Clocks, apb1: &mut APB1) -> Self {
        let i2c = BlockingI2c::i2c1(
            i2c1,
            (pins.scl, pins.sda),
            Mode::standard(BUS_HZ.Hz()),
            clocks,
            apb1,
            DATA_TIMEOUT_US,
        );
        Self { i2c }
    }

    pub fn free(self) -> BlockingI2c<pac::I2C1, I2c1Scl, I2c1Sda> {
        self.i2c
    }

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), I2cError> {
        check_len(bytes.len())?;
        Ok(self.i2c.write(address, bytes)?)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), I2cError> {
        check_len(buffer.len())?;
        Ok(self.i2c.read(address, buffer)?)
    }

    /// Write then read with a repeated START in between.
    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), I2cError> {
        check_len(bytes.len())?;
        check_len(buffer.len())?;
        Ok(self.i2c.write_read(address, bytes, buffer)?)
    }
}

impl i2c::ErrorType for I2cBus {
    type Error = I2cError;
}

impl i2c::I2c for I2cBus {
    /// A write followed by a read maps to the HAL's repeated-START `write_read`. Any other sequence
    /// runs operation by operation, each closed by its own STOP.
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if let [Operation::Write(bytes), Operation::Read(buffer)] = operations {
            return I2cBus::write_read(self, address, bytes, buffer);
        }

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => I2cBus::write(self, address, bytes)?,
                Operation::Read(buffer) => I2cBus::read(self, address, buffer)?,
            }
        }
        Ok(())
    }
}
