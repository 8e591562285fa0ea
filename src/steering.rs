//!
//! Proportional steering law for following a line edge
//!

use crate::config::ControllerConfig;
use crate::samples::Reflectance;

/// The largest steering bias the follower ever commands
pub const STEERING_LIMIT: f32 = 80.0;

/// Steering plus speed for one control tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteeringCommand {
    /// Steering bias in `[-STEERING_LIMIT, STEERING_LIMIT]`
    pub steering: f32,
    /// Speed in percent
    pub speed: f32,
}

/// Maps a reflectance reading to a clamped steering bias
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteeringLaw {
    /// Reflectance of the line edge the robot rides on
    center: f32,
    /// Steering per unit of error; the sign picks which edge is followed
    gain: f32,
    /// Speed commanded while following
    speed: f32,
}

impl SteeringLaw {
    pub fn new(center: f32, gain: f32, speed: f32) -> Self {
        Self { center, gain, speed }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.steering_center, config.steering_gain, config.forward_speed)
    }

    /// Steering bias for a reading: `(sample - center) * gain` clamped to
    /// `±STEERING_LIMIT`
    pub fn steering(&self, sample: Reflectance) -> f32 {
        let error = sample as f32 - self.center;
        let steering = error * self.gain;
        if steering.is_nan() {
            return 0.0;
        }
        steering.clamp(-STEERING_LIMIT, STEERING_LIMIT)
    }

    pub fn command(&self, sample: Reflectance) -> SteeringCommand {
        SteeringCommand {
            steering: self.steering(sample),
            speed: self.speed,
        }
    }
}
