//! Raw controller naming scheme and per-cycle snapshot.
//!
//! Both the driver and the operator use the same gamepad layout. Buttons
//! are booleans, axes are nominally in [-1, 1]; the snapshot stores what
//! the input source reported without clamping so the mapper can detect
//! out-of-range samples.

use serde::{Deserialize, Serialize};

/// Gamepad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Button {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    LeftBumper = 4,
    RightBumper = 5,
    Back = 6,
    Start = 7,
    LeftStick = 8,
    RightStick = 9,
    DpadUp = 10,
    DpadDown = 11,
    DpadLeft = 12,
    DpadRight = 13,
}

impl Button {
    pub const COUNT: usize = 14;

    pub const ALL: [Button; Self::COUNT] = [
        Self::A,
        Self::B,
        Self::X,
        Self::Y,
        Self::LeftBumper,
        Self::RightBumper,
        Self::Back,
        Self::Start,
        Self::LeftStick,
        Self::RightStick,
        Self::DpadUp,
        Self::DpadDown,
        Self::DpadLeft,
        Self::DpadRight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Gamepad analog axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Axis {
    LeftX = 0,
    LeftY = 1,
    RightX = 2,
    RightY = 3,
    LeftTrigger = 4,
    RightTrigger = 5,
}

impl Axis {
    pub const COUNT: usize = 6;

    pub const ALL: [Axis; Self::COUNT] = [
        Self::LeftX,
        Self::LeftY,
        Self::RightX,
        Self::RightY,
        Self::LeftTrigger,
        Self::RightTrigger,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One controller's state sampled at the start of a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSnapshot {
    buttons: [bool; Button::COUNT],
    axes: [f64; Axis::COUNT],
}

impl ControllerSnapshot {
    /// All buttons released, all axes centered.
    pub const fn neutral() -> Self {
        Self {
            buttons: [false; Button::COUNT],
            axes: [0.0; Axis::COUNT],
        }
    }

    #[inline]
    pub fn button(&self, button: Button) -> bool {
        self.buttons[button.index()]
    }

    /// Raw axis sample, unclamped.
    #[inline]
    pub fn axis(&self, axis: Axis) -> f64 {
        self.axes[axis.index()]
    }

    #[inline]
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.buttons[button.index()] = pressed;
    }

    #[inline]
    pub fn set_axis(&mut self, axis: Axis, value: f64) {
        self.axes[axis.index()] = value;
    }

    /// Builder-style press, mostly for scripted input.
    pub fn with_button(mut self, button: Button) -> Self {
        self.set_button(button, true);
        self
    }

    /// Builder-style axis value.
    pub fn with_axis(mut self, axis: Axis, value: f64) -> Self {
        self.set_axis(axis, value);
        self
    }
}

impl Default for ControllerSnapshot {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Both controllers for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInputFrame {
    pub driver: ControllerSnapshot,
    pub operator: ControllerSnapshot,
}

impl RawInputFrame {
    pub const fn new(driver: ControllerSnapshot, operator: ControllerSnapshot) -> Self {
        Self { driver, operator }
    }
}
