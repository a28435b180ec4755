// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! 50 Hz servo PWM on TIM4 (CH1–CH4) and TIM3 (CH1) using direct PAC register access.
//!
//! Both timers tick at 1 MHz with a 20 000-count period, so one duty count is one microsecond of
//! pulse. Channels implement `embedded_hal::pwm::SetDutyCycle` and plug into
//! [`ServoBank`](crate::drivers::ServoBank).
//!
//! Example:
//! ```ignore
//! let [shoulder, elbow, pitch, roll, grip] =
//!     ServoTimers::new(dp.TIM3, dp.TIM4, pins.servos, &clocks).channels();
//! ```

use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use stm32f7xx_hal::{pac, rcc::Clocks};

use super::pins::ServoPins;

/// Counter rate.
const TICK_HZ: u32 = 1_000_000;

/// Counts per 20 ms frame.
pub const PERIOD_TICKS: u16 = 20_000;

/// OCxM = PWM mode 1, OCxPE set, for the low channel of a CCMR register.
const CCMR_PWM1_PRELOAD: u32 = (0b110 << 4) | (1 << 3);

/// CR1 ARPE | CEN
const CR1_ARPE_CEN: u32 = (1 << 7) | 1;

macro_rules! servo_timer {
    ($init:ident, $write:ident, $TIM:ident, $en:ident) => {
        /// Clock the timer and start PWM mode 1 on `channels` at 50 Hz.
        fn $init(prescaler: u32, channels: &[u8]) {
            let rcc = unsafe { &*pac::RCC::ptr() };
            rcc.apb1enr.modify(|_, w| w.$en().set_bit());

            let tim = unsafe { &*pac::$TIM::ptr() };
            tim.cr1.write(|w| unsafe { w.bits(0) });
            tim.psc.write(|w| unsafe { w.bits(prescaler) });
            tim.arr.write(|w| unsafe { w.bits(u32::from(PERIOD_TICKS) - 1) });

            for &ch in channels {
                let shift = if ch % 2 == 1 { 0 } else { 8 };
                let mode = CCMR_PWM1_PRELOAD << shift;
                let mask = 0xFF << shift;
                if ch <= 2 {
                    tim.ccmr1_output()
                        .modify(|r, w| unsafe { w.bits((r.bits() & !mask) | mode) });
                } else {
                    tim.ccmr2_output()
                        .modify(|r, w| unsafe { w.bits((r.bits() & !mask) | mode) });
                }
                $write(ch, 0);
                tim.ccer
                    .modify(|r, w| unsafe { w.bits(r.bits() | (1 << (4 * u32::from(ch - 1)))) });
            }

            // Load PSC/ARR before the first frame
            tim.egr.write(|w| w.ug().set_bit());
            tim.cr1.write(|w| unsafe { w.bits(CR1_ARPE_CEN) });
        }

        fn $write(channel: u8, duty: u16) {
            let tim = unsafe { &*pac::$TIM::ptr() };
            let duty = u32::from(duty);
            match channel {
                1 => tim.ccr1().write(|w| unsafe { w.bits(duty) }),
                2 => tim.ccr2().write(|w| unsafe { w.bits(duty) }),
                3 => tim.ccr3().write(|w| unsafe { w.bits(duty) }),
                _ => tim.ccr4().write(|w| unsafe { w.bits(duty) }),
            }
        }
    };
}

servo_timer!(init_tim3, write_tim3, TIM3, tim3en);
servo_timer!(init_tim4, write_tim4, TIM4, tim4en);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Timer {
    Tim3,
    Tim4,
}

/// One servo output. Only obtainable from [`ServoTimers::channels`].
#[derive(Debug)]
pub struct ServoChannel {
    timer: Timer,
    channel: u8,
}

impl ErrorType for ServoChannel {
    type Error = Infallible;
}

impl SetDutyCycle for ServoChannel {
    #[inline]
    fn max_duty_cycle(&self) -> u16 {
        PERIOD_TICKS
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        let duty = duty.min(PERIOD_TICKS);
        match self.timer {
            Timer::Tim3 => write_tim3(self.channel, duty),
            Timer::Tim4 => write_tim4(self.channel, duty),
        }
        Ok(())
    }
}

/// Owns the two servo timers and their pins.
pub struct ServoTimers {
    _tim3: pac::TIM3,
    _tim4: pac::TIM4,
    _pins: ServoPins,
}

impl ServoTimers {
    pub fn new(tim3: pac::TIM3, tim4: pac::TIM4, pins: ServoPins, clocks: &Clocks) -> Self {
        // Both timers sit on APB1
        let prescaler = (clocks.timclk1().raw() / TICK_HZ).saturating_sub(1);

        init_tim4(prescaler, &[1, 2, 3, 4]);
        init_tim3(prescaler, &[1]);

        Self {
            _tim3: tim3,
            _tim4: tim4,
            _pins: pins,
        }
    }

    /// Outputs in joint order: shoulder, elbow, hand pitch, hand roll, grip.
    pub fn channels(self) -> [ServoChannel; 5] {
        let ch = |timer, channel| ServoChannel { timer, channel };
        [
            ch(Timer::Tim4, 1),
            ch(Timer::Tim4, 2),
            ch(Timer::Tim4, 3),
            ch(Timer::Tim4, 4),
            ch(Timer::Tim3, 1),
        ]
    }
}
