// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Flex sensor sampling on ADC1 using direct PAC register access.
//!
//! Blocking single-channel conversions, one per call. Results are widened to the 16-bit scale the
//! calibration constants use.
//!
//! Example:
//! ```ignore
//! let adc = Adc::adc1(dp.ADC1, pins.flex);
//! let mut read_flex = adc.flex_reader(FLEX_CHANNELS);
//! let elbow = read_flex(FlexSensor::Elbow);
//! ```

use stm32f7xx_hal::pac;

use crate::drivers::glove::widen_adc12;
use crate::drivers::FlexSensor;

use super::pins::FlexPins;

/// ADC1 input for each flex sensor, indexed by [`FlexSensor::index`].
pub type FlexChannels = [u8; FlexSensor::COUNT];

/// Shoulder on PA3 (IN3), elbow on PC0 (IN10), grip on PC3 (IN13).
pub const FLEX_CHANNELS: FlexChannels = [3, 10, 13];

/// Longest sample time (480 cycles); the flex dividers are high impedance.
const SMP_480_CYCLES: u32 = 0b111;

pub struct Adc {
    adc: pac::ADC1,
    pins: FlexPins,
}

impl Adc {
    /// Clock and initialize ADC1: 12-bit, right-aligned, software trigger.
    pub fn adc1(adc1: pac::ADC1, pins: FlexPins) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        // PCLK2 / 4
        common.ccr.modify(|_, w| w.adcpre().div4());

        adc1.cr2.modify(|_, w| w.adon().clear_bit());
        adc1.cr1.modify(|_, w| w.res().bits(0b00));
        adc1.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w
        });
        adc1.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc: adc1, pins }
    }

    #[inline]
    pub fn free(self) -> (pac::ADC1, FlexPins) {
        (self.adc, self.pins)
    }

    /// Set the sample time of `channel` (0..=18).
    fn set_sample_time(&self, channel: u8) {
        let channel = u32::from(channel);
        if channel <= 9 {
            let shift = 3 * channel;
            self.adc.smpr2.modify(|r, w| unsafe {
                w.bits((r.bits() & !(0b111 << shift)) | (SMP_480_CYCLES << shift))
            });
        } else {
            let shift = 3 * (channel - 10);
            self.adc.smpr1.modify(|r, w| unsafe {
                w.bits((r.bits() & !(0b111 << shift)) | (SMP_480_CYCLES << shift))
            });
        }
    }

    /// One 12-bit conversion of `channel`.
    pub fn read(&mut self, channel: u8) -> u16 {
        self.set_sample_time(channel);

        // Sequence of one conversion
        self.adc.sqr1.modify(|_, w| w.l().bits(0));
        self.adc
            .sqr3
            .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });

        self.adc.cr2.modify(|_, w| w.swstart().set_bit());
        while self.adc.sr.read().eoc().bit_is_clear() {}

        self.adc.dr.read().data().bits()
    }

    /// Consume the ADC into a flex reader for [`GloveSensors`](crate::drivers::GloveSensors).
    pub fn flex_reader(mut self, channels: FlexChannels) -> impl FnMut(FlexSensor) -> u16 {
        move |sensor| widen_adc12(self.read(channels[sensor.index()]))
    }
}
