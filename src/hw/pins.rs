// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 arm controller board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpioc, gpiod, Alternate, Analog, OpenDrain},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub i2c1: I2c1Pins,
    pub flex: FlexPins,
    pub servos: ServoPins,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

pub type I2c1Scl = gpiob::PB8<Alternate<4, OpenDrain>>;
pub type I2c1Sda = gpiob::PB9<Alternate<4, OpenDrain>>;

/// MPU-6050 bus. Pull-ups are on the sensor breakout.
pub struct I2c1Pins {
    pub scl: I2c1Scl,
    pub sda: I2c1Sda,
}

/// Flex sensor voltage dividers
pub struct FlexPins {
    pub shoulder: gpioa::PA3<Analog>, // ADC1_IN3
    pub elbow: gpioc::PC0<Analog>,    // ADC1_IN10
    pub grip: gpioc::PC3<Analog>,     // ADC1_IN13
}

/// Servo signal lines, in joint order
pub struct ServoPins {
    pub shoulder: gpiod::PD12<Alternate<2>>, // TIM4_CH1
    pub elbow: gpiod::PD13<Alternate<2>>,    // TIM4_CH2
    pub hand_pitch: gpiod::PD14<Alternate<2>>, // TIM4_CH3
    pub hand_roll: gpiod::PD15<Alternate<2>>,  // TIM4_CH4
    pub grip: gpioa::PA6<Alternate<2>>,      // TIM3_CH1
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpioc: pac::GPIOC, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            flex: FlexPins {
                shoulder: gpioa.pa3.into_analog(),
                elbow: gpioc.pc0.into_analog(),
                grip: gpioc.pc3.into_analog(),
            },

            servos: ServoPins {
                shoulder: gpiod.pd12.into_alternate::<2>(),
                elbow: gpiod.pd13.into_alternate::<2>(),
                hand_pitch: gpiod.pd14.into_alternate::<2>(),
                hand_roll: gpiod.pd15.into_alternate::<2>(),
                grip: gpioa.pa6.into_alternate::<2>(),
            },
        }
    }
}
