// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use core::fmt::Write;

use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use glove_arm::control::ActuationScheduler;
use glove_arm::drivers::{GloveSensors, Mpu6050, ServoBank};
use glove_arm::hw::{usart, Adc, BoardPins, I2cBus, ServoTimers, SysDelay, Usart, FLEX_CHANNELS};
use glove_arm::{ArmConfig, Joint};

fn halt() -> ! {
    loop {
        cortex_m::asm::nop();
    }
}

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD);

    // USART1 (DBG)
    let usart_cfg = Config {
        baud_rate: usart::BAUD_RATE.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (pins.usart1.tx, pins.usart1.rx), &clocks, usart_cfg);
    let mut usart = Usart::new(serial);
    usart.println("glove-arm");

    let config = ArmConfig::DEFAULT;
    if let Err(e) = config.validate() {
        let _ = write!(usart, "config rejected: {}\r\n", e);
        halt();
    }

    // Glove: flex sensors on ADC1, MPU-6050 on I2C1
    let read_flex = Adc::adc1(dp.ADC1, pins.flex).flex_reader(FLEX_CHANNELS);
    // I2C timeouts count DWT cycles
    cp.DCB.enable_trace();
    cp.DWT.enable_cycle_counter();
    let imu = Mpu6050::new(I2cBus::i2c1(dp.I2C1, pins.i2c1, &clocks, &mut rcc.apb1));
    let glove = match GloveSensors::new(read_flex, imu) {
        Ok(glove) => glove,
        Err(e) => {
            let _ = write!(usart, "MPU-6050 not responding: {}\r\n", e);
            halt();
        }
    };

    // Servos 17..=21 on TIM4 CH1-4 and TIM3 CH1
    let [shoulder, elbow, pitch, roll, grip] =
        ServoTimers::new(dp.TIM3, dp.TIM4, pins.servos, &clocks).channels();
    let servo = |joint| config.joint(joint).servo;
    let servos = ServoBank::new([
        (servo(Joint::ShoulderUpDown), shoulder),
        (servo(Joint::ElbowUpDown), elbow),
        (servo(Joint::HandUpDown), pitch),
        (servo(Joint::HandRotation), roll),
        (servo(Joint::HandGrip), grip),
    ]);

    let delay = SysDelay::new(cp.SYST, clocks.sysclk().raw());

    let Ok(mut arm) = ActuationScheduler::new(glove, servos, delay, usart, config) else {
        halt();
    };

    let fault = match arm.run() {
        Ok(never) => match never {},
        Err(fault) => fault,
    };

    // Servos hold their last pulse; report and stop.
    let cycles = arm.cycles();
    let usart = arm.trace();
    let _ = write!(usart, "halted after {} cycles: {}\r\n", cycles, fault);
    usart.flush();
    halt();
}
