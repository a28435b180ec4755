// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Joint channels of the arm and the per-joint angle record.

use core::fmt;
use core::ops::{Index, IndexMut};

/// One actuated joint of the arm.
///
/// Variants are listed in actuation order; [`Joint::ALL`] is the order the scheduler drives them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Joint {
    ShoulderUpDown,
    ElbowUpDown,
    HandUpDown,
    HandRotation,
    HandGrip,
}

impl Joint {
    pub const COUNT: usize = 5;

    /// Fixed actuation order.
    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::ShoulderUpDown,
        Joint::ElbowUpDown,
        Joint::HandUpDown,
        Joint::HandRotation,
        Joint::HandGrip,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Joint::ShoulderUpDown => "ShoulderUpDown",
            Joint::ElbowUpDown => "ElbowUpDown",
            Joint::HandUpDown => "HandUpDown",
            Joint::HandRotation => "HandRotation",
            Joint::HandGrip => "HandGrip",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Actuator identifier, i.e. the servo output a joint is wired to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServoId(pub u8);

impl fmt::Display for ServoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "servo {}", self.0)
    }
}

/// One angle (degrees) per joint, indexed by [`Joint`].
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct JointAngles([f32; Joint::COUNT]);

impl JointAngles {
    /// Iterate `(joint, angle)` pairs in actuation order.
    pub fn iter(&self) -> impl Iterator<Item = (Joint, f32)> + '_ {
        Joint::ALL.iter().map(move |&joint| (joint, self.0[joint.index()]))
    }
}

impl Index<Joint> for JointAngles {
    type Output = f32;

    #[inline]
    fn index(&self, joint: Joint) -> &f32 {
        &self.0[joint.index()]
    }
}

impl IndexMut<Joint> for JointAngles {
    #[inline]
    fn index_mut(&mut self, joint: Joint) -> &mut f32 {
        &mut self.0[joint.index()]
    }
}
