// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SysTick busy-wait delay exposed as `embedded_hal::delay::DelayNs`.

use cortex_m::delay::Delay;
use embedded_hal::delay::DelayNs;

pub struct SysDelay {
    delay: Delay,
}

impl SysDelay {
    /// Take over SysTick, clocked from the core at `sysclk_hz`.
    pub fn new(syst: cortex_m::peripheral::SYST, sysclk_hz: u32) -> Self {
        Self {
            delay: Delay::new(syst, sysclk_hz),
        }
    }

    pub fn free(self) -> cortex_m::peripheral::SYST {
        self.delay.free()
    }
}

impl DelayNs for SysDelay {
    fn delay_ns(&mut self, ns: u32) {
        // SysTick resolution is one microsecond here; round up.
        self.delay.delay_us(ns.div_ceil(1_000));
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
