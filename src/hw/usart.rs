// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Debug terminal on USART1.
//!
//! Receives the per-cycle angle trace and the fault report. Implements `core::fmt::Write`, so the
//! control loop can take it as its trace sink.
//!
//! Note: When using `writeln!`, be sure to include `\r` (CR) in the format string to ensure correct
//! line endings on the terminal.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* 115200
//! ```

use core::fmt;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

/// Terminal baud rate.
pub const BAUD_RATE: u32 = 115_200;

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    /// Keep the transmit half; nothing is read from the terminal.
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            let _ = block!(self.tx.write(b));
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
        self.write_bytes(b"\r\n");
    }

    /// Block until the last byte has left the shifter.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}
