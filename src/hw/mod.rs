// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Board Support
//!
//! STM32F777 peripherals behind the `embedded-hal` traits the drivers consume.

pub mod adc;
pub mod delay;
pub mod i2c;
pub mod pins;
pub mod servo_pwm;
pub mod usart;

pub use adc::{Adc, FLEX_CHANNELS};
pub use delay::SysDelay;
pub use i2c::{I2cBus, I2cError};
pub use pins::BoardPins;
pub use servo_pwm::{ServoChannel, ServoTimers};
pub use usart::Usart;
