// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hobby servos driven from PWM channels.
//!
//! Standard 50 Hz servo framing: a 0.5 ms pulse is 0°, a 2.5 ms pulse is 180°, linear in between.
//! Each channel only needs `embedded_hal::pwm::SetDutyCycle` with its period set to 20 ms.

use core::fmt;

use embedded_hal::pwm::SetDutyCycle;

use crate::control::calibration::{clamp_angle, MAX_ANGLE_DEG};
use crate::drivers::ActuatorAdapter;
use crate::joint::ServoId;

/// PWM frame length.
pub const PERIOD_MS: f32 = 20.0;

/// Pulse width at 0°.
pub const MIN_PULSE_MS: f32 = 0.5;

/// Pulse width gained over the full 180° of travel.
pub const PULSE_SPAN_MS: f32 = 2.0;

/// Pulse width commanding `angle_deg`, clamped to the servo range first.
#[inline]
pub fn pulse_width_ms(angle_deg: f32) -> f32 {
    MIN_PULSE_MS + (clamp_angle(angle_deg) / MAX_ANGLE_DEG) * PULSE_SPAN_MS
}

/// Duty count for a pulse of `pulse_ms` on a channel whose full period is `max_duty` counts.
pub fn duty_for_pulse(pulse_ms: f32, max_duty: u16) -> u16 {
    let pulse_ms = pulse_ms.clamp(0.0, PERIOD_MS);
    let duty = pulse_ms / PERIOD_MS * f32::from(max_duty);
    // Round to nearest
    (duty + 0.5) as u16
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ServoError<E> {
    /// No channel is registered under this id.
    UnknownServo(ServoId),
    Pwm(E),
}

impl<E: fmt::Debug> fmt::Display for ServoError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServoError::UnknownServo(id) => write!(f, "no PWM channel for {}", id),
            ServoError::Pwm(e) => write!(f, "PWM error: {:?}", e),
        }
    }
}

/// Servo outputs addressed by [`ServoId`].
pub struct ServoBank<P, const N: usize> {
    channels: [(ServoId, P); N],
}

impl<P, const N: usize> ServoBank<P, N>
where
    P: SetDutyCycle,
{
    pub fn new(channels: [(ServoId, P); N]) -> Self {
        Self { channels }
    }

    pub fn free(self) -> [(ServoId, P); N] {
        self.channels
    }

    fn channel(&mut self, servo: ServoId) -> Option<&mut P> {
        self.channels
            .iter_mut()
            .find(|(id, _)| *id == servo)
            .map(|(_, pwm)| pwm)
    }

    /// Drive `servo` to `angle_deg`.
    #[inline]
    pub fn set_angle(&mut self, servo: ServoId, angle_deg: f32) -> Result<(), ServoError<P::Error>> {
        self.set_pulse_width(servo, pulse_width_ms(angle_deg))
    }

    /// Stop pulsing `servo` so it no longer holds position.
    pub fn release(&mut self, servo: ServoId) -> Result<(), ServoError<P::Error>> {
        let pwm = self.channel(servo).ok_or(ServoError::UnknownServo(servo))?;
        pwm.set_duty_cycle_fully_off().map_err(ServoError::Pwm)
    }
}

impl<P, const N: usize> ActuatorAdapter for ServoBank<P, N>
where
    P: SetDutyCycle,
{
    type Error = ServoError<P::Error>;

    fn set_pulse_width(&mut self, servo: ServoId, pulse_ms: f32) -> Result<(), Self::Error> {
        let pwm = self.channel(servo).ok_or(ServoError::UnknownServo(servo))?;
        let duty = duty_for_pulse(pulse_ms, pwm.max_duty_cycle());
        pwm.set_duty_cycle(duty).map_err(ServoError::Pwm)
    }
}
