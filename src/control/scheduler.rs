// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-cadence actuation loop.
//!
//! The scheduler owns the peripherals and the per-joint [`FilterState`]. Each call to
//! [`step`](ActuationScheduler::step) runs one full cycle:
//!
//! 1. read the three flex sensors and the hand tilt,
//! 2. calibrate all five joints,
//! 3. write the angles to the diagnostic trace,
//! 4. command the joints in [`ACTUATION_SCHEDULE`] order, pausing after each one.
//!
//! The pauses keep consecutive servo pulses on the shared PWM block apart and set the loop rate.
//! Nothing runs concurrently; cycle N, trailing pause included, finishes before cycle N+1 reads.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! let mut arm = ActuationScheduler::new(glove, servos, delay, usart, ArmConfig::DEFAULT)?;
//! let fault = arm.run().unwrap_err();
//! ```

use core::convert::Infallible;
use core::fmt::Write;

use embedded_hal::delay::DelayNs;

use crate::config::ArmConfig;
use crate::control::motion_filter::{self, FilterState, ServoCommand};
use crate::drivers::{ActuatorAdapter, FlexSensor, GloveSample, SensorAdapter};
use crate::error::{ConfigError, Fault};
use crate::joint::{Joint, JointAngles};

/// One actuation and the pause that follows it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PacedStep {
    pub joint: Joint,
    pub settle_ms: u32,
}

impl PacedStep {
    pub const fn new(joint: Joint, settle_ms: u32) -> Self {
        Self { joint, settle_ms }
    }
}

/// Actuation order and pacing for every cycle.
pub const ACTUATION_SCHEDULE: [PacedStep; Joint::COUNT] = [
    PacedStep::new(Joint::ShoulderUpDown, 100),
    PacedStep::new(Joint::ElbowUpDown, 100),
    PacedStep::new(Joint::HandUpDown, 100),
    PacedStep::new(Joint::HandRotation, 100),
    PacedStep::new(Joint::HandGrip, 200),
];

/// Outcome of one cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CycleReport {
    /// Calibrated angles, before filtering and mounting correction.
    pub angles: JointAngles,
    /// Command issued per joint, `None` where the filter held the joint.
    pub commands: [Option<ServoCommand>; Joint::COUNT],
}

impl CycleReport {
    #[inline]
    pub fn command(&self, joint: Joint) -> Option<&ServoCommand> {
        self.commands[joint.index()].as_ref()
    }

    /// Commands in the order they were issued.
    pub fn issued(&self) -> impl Iterator<Item = &ServoCommand> + '_ {
        ACTUATION_SCHEDULE
            .iter()
            .filter_map(move |step| self.command(step.joint))
    }
}

/// Control loop tying glove sensors to arm servos.
///
/// - `S` – glove readings
/// - `A` – servo outputs
/// - `D` – pacing delay
/// - `W` – diagnostic trace sink
pub struct ActuationScheduler<S, A, D, W> {
    sensors: S,
    actuators: A,
    delay: D,
    trace: W,
    config: ArmConfig,
    state: FilterState,
    cycles: u32,
}

impl<S, A, D, W> ActuationScheduler<S, A, D, W>
where
    S: SensorAdapter,
    A: ActuatorAdapter,
    D: DelayNs,
    W: Write,
{
    /// Validate `config` and start with every joint's last command at 0°.
    pub fn new(
        sensors: S,
        actuators: A,
        delay: D,
        trace: W,
        config: ArmConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            sensors,
            actuators,
            delay,
            trace,
            config,
            state: FilterState::new(),
            cycles: 0,
        })
    }

    #[inline]
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Completed cycles (wraps).
    #[inline]
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Access the trace sink, e.g. to report a fault after [`run`](Self::run) returns.
    pub fn trace(&mut self) -> &mut W {
        &mut self.trace
    }

    pub fn free(self) -> (S, A, D, W) {
        (self.sensors, self.actuators, self.delay, self.trace)
    }

    /// Read every glove sensor once: shoulder, elbow and grip flex, then tilt.
    pub fn sample(&mut self) -> Result<GloveSample, Fault<S::Error, A::Error>> {
        let mut sample = GloveSample::default();
        for sensor in FlexSensor::ALL {
            sample.flex[sensor.index()] = self.sensors.read_raw(sensor).map_err(Fault::Sensor)?;
        }
        sample.orientation = self.sensors.read_orientation().map_err(Fault::Sensor)?;
        Ok(sample)
    }

    fn trace_angles(&mut self, angles: &JointAngles) {
        for (joint, angle) in angles.iter() {
            // Diagnostics never fail a cycle.
            let _ = write!(self.trace, "Angle {}: {}\r\n", joint, angle);
        }
    }

    /// Filter one joint and, if it passes, command it. State is committed only once the actuator
    /// accepted the command.
    fn actuate(
        &mut self,
        joint: Joint,
        angle: f32,
    ) -> Result<Option<ServoCommand>, Fault<S::Error, A::Error>> {
        let config = self.config.joint(joint);
        let Some(command) = motion_filter::plan(joint, config, angle, &self.state) else {
            return Ok(None);
        };

        self.actuators
            .set_pulse_width(command.servo, command.pulse_ms)
            .map_err(|error| Fault::Actuator { joint, error })?;
        self.state.commit(&command);

        Ok(Some(command))
    }

    /// Run one cycle. Stops at the first peripheral failure; commands already issued in this
    /// cycle stay issued.
    pub fn step(&mut self) -> Result<CycleReport, Fault<S::Error, A::Error>> {
        let sample = self.sample()?;
        let angles = self.config.calibrate(&sample);
        self.trace_angles(&angles);

        let mut commands = [None; Joint::COUNT];
        for step in ACTUATION_SCHEDULE {
            commands[step.joint.index()] = self.actuate(step.joint, angles[step.joint])?;
            self.delay.delay_ms(step.settle_ms);
        }

        self.cycles = self.cycles.wrapping_add(1);
        Ok(CycleReport { angles, commands })
    }

    /// Cycle forever. Only returns on a fault.
    pub fn run(&mut self) -> Result<Infallible, Fault<S::Error, A::Error>> {
        loop {
            self.step()?;
        }
    }
}
