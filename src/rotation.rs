//!
//! Heading-bounded in-place rotation
//!
//! A rotation is started right after the heading reference has been reset,
//! so its target is relative to where the robot was pointing at that moment.
//!

use common::MAX_STEERING;

/// Direction of an in-place turn, in the gyro's sign convention
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Heading increases
    Clockwise,
    /// Heading decreases
    CounterClockwise,
}

impl Direction {
    /// The steering bias that pivots the robot this way
    pub fn steering(self) -> f32 {
        match self {
            Self::Clockwise => MAX_STEERING,
            Self::CounterClockwise => -MAX_STEERING,
        }
    }
}

/// Result of checking a rotation against the latest heading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationStatus {
    /// Keep turning
    Turning,
    /// The target heading has been reached or passed
    Reached,
    /// The watchdog ran out before the target was reached
    TimedOut,
}

/// A single turn towards a relative heading
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    direction: Direction,
    target: f32,
    watchdog: Option<u32>,
    polls: u32,
}

impl Rotation {
    /// A turn to `target` degrees; the direction follows the target's sign
    pub fn toward(target: f32, watchdog: Option<u32>) -> Self {
        let direction = if target < 0.0 {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        };

        Self {
            direction,
            target,
            watchdog,
            polls: 0,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Number of polls that found the target not yet reached
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Whether `heading` is at or past the target in the turn's direction
    pub fn reached(&self, heading: f32) -> bool {
        match self.direction {
            Direction::Clockwise => heading >= self.target,
            Direction::CounterClockwise => heading <= self.target,
        }
    }

    /// Check the latest heading; each call that is not `Reached` counts
    /// against the watchdog
    pub fn poll(&mut self, heading: f32) -> RotationStatus {
        if self.reached(heading) {
            return RotationStatus::Reached;
        }

        if let Some(watchdog) = self.watchdog {
            if self.polls >= watchdog {
                return RotationStatus::TimedOut;
            }
        }

        self.polls += 1;
        RotationStatus::Turning
    }
}
