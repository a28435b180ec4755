// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Whole control cycles against scripted peripherals.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use glove_arm::config::{ArmConfig, JointConfig, FLEX_CURVE};
use glove_arm::control::calibration::{CalibrationCurve, TwoPointCurve};
use glove_arm::control::ActuationScheduler;
use glove_arm::drivers::{
    ActuatorAdapter, FlexSensor, Orientation, SensorAdapter, ServoBank,
};
use glove_arm::{ConfigError, Fault, Joint, ServoId};

#[derive(Clone, Debug, PartialEq)]
enum Event {
    ReadFlex(FlexSensor),
    ReadTilt,
    Pulse(u8, f32),
    Pause(u32),
}

type Log = Rc<RefCell<Vec<Event>>>;

#[derive(Debug, PartialEq)]
struct BusDown;

enum FlexSource {
    Fixed([u16; 3]),
    Shared(Rc<Cell<[u16; 3]>>),
}

impl FlexSource {
    fn get(&self) -> [u16; 3] {
        match self {
            FlexSource::Fixed(flex) => *flex,
            FlexSource::Shared(cell) => cell.get(),
        }
    }
}

struct Glove {
    log: Log,
    flex: FlexSource,
    tilt: Orientation,
    tilt_fails: bool,
}

impl SensorAdapter for Glove {
    type Error = BusDown;

    fn read_raw(&mut self, sensor: FlexSensor) -> Result<u16, BusDown> {
        self.log.borrow_mut().push(Event::ReadFlex(sensor));
        Ok(self.flex.get()[sensor.index()])
    }

    fn read_orientation(&mut self) -> Result<Orientation, BusDown> {
        self.log.borrow_mut().push(Event::ReadTilt);
        if self.tilt_fails {
            return Err(BusDown);
        }
        Ok(self.tilt)
    }
}

struct Servos {
    log: Log,
    broken: Option<ServoId>,
}

impl ActuatorAdapter for Servos {
    type Error = BusDown;

    fn set_pulse_width(&mut self, servo: ServoId, pulse_ms: f32) -> Result<(), BusDown> {
        if self.broken == Some(servo) {
            return Err(BusDown);
        }
        self.log.borrow_mut().push(Event::Pulse(servo.0, pulse_ms));
        Ok(())
    }
}

struct Pacer {
    log: Log,
}

impl DelayNs for Pacer {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::Pause(ms));
    }
}

/// Shoulder 90°, elbow 135° (commanded 45° mirrored), pitch 95°, rotation 120°, grip 90°.
const POSED: [u16; 3] = [3760, 3070, 2140];
const POSED_TILT: Orientation = Orientation::new(5.0, -30.0);

fn arm(
    flex: [u16; 3],
    tilt: Orientation,
) -> (ActuationScheduler<Glove, Servos, Pacer, String>, Log) {
    let log: Log = Rc::default();
    let glove = Glove {
        log: log.clone(),
        flex: FlexSource::Fixed(flex),
        tilt,
        tilt_fails: false,
    };
    let servos = Servos {
        log: log.clone(),
        broken: None,
    };
    let pacer = Pacer { log: log.clone() };

    let arm = ActuationScheduler::new(glove, servos, pacer, String::new(), ArmConfig::DEFAULT)
        .expect("default config is valid");
    (arm, log)
}

fn pulses(log: &Log) -> Vec<(u8, f32)> {
    log.borrow()
        .iter()
        .filter_map(|e| match *e {
            Event::Pulse(id, ms) => Some((id, ms)),
            _ => None,
        })
        .collect()
}

#[test]
fn one_cycle_reads_then_actuates_in_fixed_order() {
    let (mut arm, log) = arm(POSED, POSED_TILT);
    arm.step().unwrap();

    let events = log.borrow();
    assert_eq!(
        events[..4],
        [
            Event::ReadFlex(FlexSensor::Shoulder),
            Event::ReadFlex(FlexSensor::Elbow),
            Event::ReadFlex(FlexSensor::Grip),
            Event::ReadTilt,
        ]
    );

    let rest: Vec<String> = events[4..]
        .iter()
        .map(|e| match *e {
            Event::Pulse(id, _) => format!("servo {id}"),
            Event::Pause(ms) => format!("pause {ms}"),
            ref other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        rest,
        [
            "servo 17", "pause 100", "servo 18", "pause 100", "servo 19", "pause 100",
            "servo 20", "pause 100", "servo 21", "pause 200",
        ]
    );
    assert_eq!(arm.cycles(), 1);
}

#[test]
fn cycle_report_matches_commands() {
    let (mut arm, _) = arm(POSED, POSED_TILT);
    let report = arm.step().unwrap();

    assert_eq!(report.angles[Joint::HandUpDown], 95.0);
    assert_eq!(report.angles[Joint::HandRotation], 120.0);

    let elbow = report.command(Joint::ElbowUpDown).expect("elbow moved");
    approx::assert_relative_eq!(elbow.angle_deg, 45.0, epsilon = 1e-3);

    let issued: Vec<Joint> = report.issued().map(|c| c.joint).collect();
    assert_eq!(issued, Joint::ALL.to_vec());
}

#[test]
fn trace_lists_every_joint_before_filtering() {
    let (mut arm, _) = arm([2400, 3070, 2140], POSED_TILT);
    arm.step().unwrap();

    let trace = arm.trace().clone();
    let lines: Vec<&str> = trace.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Angle ShoulderUpDown: 0");
    assert!(lines[1].starts_with("Angle ElbowUpDown: 13"));
    assert_eq!(lines[2], "Angle HandUpDown: 95");
    assert_eq!(lines[3], "Angle HandRotation: 120");
    assert!(lines[4].starts_with("Angle HandGrip: "));
}

#[test]
fn low_elbow_reading_commands_right_angle() {
    let (mut arm, log) = arm([0, 1000, 0], Orientation::new(0.0, 0.0));
    let report = arm.step().unwrap();

    assert_eq!(report.angles[Joint::ElbowUpDown], 90.0);
    assert!(pulses(&log).contains(&(18, 1.5)));
    assert_eq!(arm.state().last(Joint::ElbowUpDown), 90.0);
}

#[test]
fn steady_pose_is_not_recommanded() {
    let (mut arm, log) = arm(POSED, POSED_TILT);
    arm.step().unwrap();
    log.borrow_mut().clear();

    let report = arm.step().unwrap();
    assert!(report.commands.iter().all(Option::is_none));
    assert!(pulses(&log).is_empty());

    // Pacing still runs on an idle cycle.
    let pauses = log
        .borrow()
        .iter()
        .filter(|e| matches!(e, Event::Pause(_)))
        .count();
    assert_eq!(pauses, 5);
}

#[test]
fn home_signal_is_resent_every_cycle() {
    let (mut arm, log) = arm([2400, 3070, 2140], POSED_TILT);
    arm.step().unwrap();
    arm.step().unwrap();

    let shoulder: Vec<f32> = pulses(&log)
        .into_iter()
        .filter(|&(id, _)| id == 17)
        .map(|(_, ms)| ms)
        .collect();
    assert_eq!(shoulder, vec![0.5, 0.5]);
}

#[test]
fn grip_follows_one_degree_while_elbow_holds() {
    let log: Log = Rc::default();
    let pose = Rc::new(Cell::new(POSED));
    let glove = Glove {
        log: log.clone(),
        flex: FlexSource::Shared(pose.clone()),
        tilt: POSED_TILT,
        tilt_fails: false,
    };
    let servos = Servos {
        log: log.clone(),
        broken: None,
    };
    let pacer = Pacer { log: log.clone() };
    let mut arm =
        ActuationScheduler::new(glove, servos, pacer, String::new(), ArmConfig::DEFAULT).unwrap();
    arm.step().unwrap();
    log.borrow_mut().clear();

    // One degree further on both two-point sensors.
    let elbow_136 = FLEX_CURVE.raw_for(136.0).round() as u16;
    let grip_91 = FLEX_CURVE.raw_for(91.0).round() as u16;
    pose.set([POSED[0], elbow_136, grip_91]);
    let report = arm.step().unwrap();

    assert!(report.command(Joint::ElbowUpDown).is_none());
    let grip = report.command(Joint::HandGrip).expect("grip follows");
    approx::assert_abs_diff_eq!(grip.angle_deg, 91.0, epsilon = 0.1);
    assert_eq!(pulses(&log).iter().map(|&(id, _)| id).collect::<Vec<_>>(), vec![21]);
}

#[test]
fn steady_full_bend_on_mirrored_elbow_is_sent_once() {
    let log: Log = Rc::default();
    let pose = Rc::new(Cell::new(POSED));
    let glove = Glove {
        log: log.clone(),
        flex: FlexSource::Shared(pose.clone()),
        tilt: Orientation::new(0.0, 0.0),
        tilt_fails: false,
    };
    let servos = Servos {
        log: log.clone(),
        broken: None,
    };
    let pacer = Pacer { log: log.clone() };
    let mut arm =
        ActuationScheduler::new(glove, servos, pacer, String::new(), ArmConfig::DEFAULT).unwrap();
    arm.step().unwrap();

    // Bend the elbow past the top of its curve and hold it there.
    pose.set([POSED[0], 4095, POSED[2]]);
    let report = arm.step().unwrap();
    assert_eq!(report.angles[Joint::ElbowUpDown], 180.0);
    assert_eq!(report.command(Joint::ElbowUpDown).map(|c| c.angle_deg), Some(0.0));
    for _ in 0..3 {
        let report = arm.step().unwrap();
        assert!(report.command(Joint::ElbowUpDown).is_none());
    }

    let elbow: Vec<f32> = pulses(&log)
        .into_iter()
        .filter(|&(id, _)| id == 18)
        .map(|(_, ms)| ms)
        .collect();
    assert_eq!(elbow.len(), 2);
    assert_eq!(elbow[1], 0.5);
}

#[test]
fn sensor_fault_stops_before_any_command() {
    let (arm_ok, log) = arm(POSED, POSED_TILT);
    let (glove, servos, pacer, trace) = arm_ok.free();
    let glove = Glove {
        tilt_fails: true,
        ..glove
    };
    let mut arm = ActuationScheduler::new(glove, servos, pacer, trace, ArmConfig::DEFAULT).unwrap();

    assert_eq!(arm.step(), Err(Fault::Sensor(BusDown)));
    assert!(pulses(&log).is_empty());
    assert_eq!(arm.cycles(), 0);
    assert!(arm.trace().is_empty());
}

#[test]
fn actuator_fault_keeps_earlier_commands_and_skips_commit() {
    let (arm_ok, log) = arm(POSED, POSED_TILT);
    let (glove, servos, pacer, trace) = arm_ok.free();
    let servos = Servos {
        broken: Some(ServoId(19)),
        ..servos
    };
    let mut arm = ActuationScheduler::new(glove, servos, pacer, trace, ArmConfig::DEFAULT).unwrap();

    assert_eq!(
        arm.run().unwrap_err(),
        Fault::Actuator {
            joint: Joint::HandUpDown,
            error: BusDown
        }
    );

    let ids: Vec<u8> = pulses(&log).into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![17, 18]);
    assert_eq!(arm.state().last(Joint::HandUpDown), 0.0);
    assert_ne!(arm.state().last(Joint::ShoulderUpDown), 0.0);
}

#[test]
fn invalid_config_is_rejected() {
    let (arm_ok, _) = arm(POSED, POSED_TILT);
    let (glove, servos, pacer, trace) = arm_ok.free();

    let flat = JointConfig {
        curve: CalibrationCurve::TwoPoint(TwoPointCurve::new(700.0, 700.0)),
        ..*ArmConfig::DEFAULT.joint(Joint::ElbowUpDown)
    };
    let config = ArmConfig::DEFAULT.with_joint(Joint::ElbowUpDown, flat);

    assert_eq!(
        ActuationScheduler::new(glove, servos, pacer, trace, config).err(),
        Some(ConfigError::DegenerateTwoPoint(Joint::ElbowUpDown))
    );
}

/// 1 µs per count at 50 Hz.
struct FakePwm(u16);

impl ErrorType for FakePwm {
    type Error = Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        20_000
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.0 = duty;
        Ok(())
    }
}

#[test]
fn mirrored_elbow_drives_pwm_at_ten_degrees() {
    let log: Log = Rc::default();
    let glove = Glove {
        log: log.clone(),
        flex: FlexSource::Fixed([0, FLEX_CURVE.raw_for(170.0) as u16, 0]),
        tilt: Orientation::new(0.0, 0.0),
        tilt_fails: false,
    };
    let bank = ServoBank::new([
        (ServoId(17), FakePwm(0)),
        (ServoId(18), FakePwm(0)),
        (ServoId(19), FakePwm(0)),
        (ServoId(20), FakePwm(0)),
        (ServoId(21), FakePwm(0)),
    ]);

    let mut arm = ActuationScheduler::new(
        glove,
        bank,
        Pacer { log: log.clone() },
        String::new(),
        ArmConfig::DEFAULT,
    )
    .unwrap();
    arm.step().unwrap();

    let (_, bank, _, _) = arm.free();
    let [shoulder, elbow, pitch, rotation, _] = bank.free();
    // 0.5 ms + 10/180 * 2 ms
    assert_eq!(elbow.1 .0, 611);
    assert_eq!(shoulder.1 .0, 500);
    assert_eq!(pitch.1 .0, 1500);
    assert_eq!(rotation.1 .0, 1500);
}
