//!
//! Dead-reckoning position estimate for the path log
//!
//! Forward travel comes from the wheel encoders; heading comes from a gyro,
//! which drifts far less than the encoder difference does while pivoting.
//!

use core::f32::consts::PI;
use core::fmt::Debug;

use libm::{cosf, sinf};
use nalgebra::base::*;

/// Wheel diameter of the default chassis (cm)
pub const WHEEL_DIAMETER: f32 = 5.6;

/// Cumulative wheel positions and the tracking gyro
pub trait WheelEncoders {
    type Error: Debug;

    /// Cumulative (left, right) wheel rotation in degrees
    fn wheel_degrees(&mut self) -> Result<(i32, i32), Self::Error>;

    /// Heading of the tracking gyro in degrees, clockwise positive
    fn heading_degrees(&mut self) -> Result<f32, Self::Error>;
}

pub struct Odometry {
    /// Wheel circumference (cm)
    wheel_circumference: f32,
    /// Encoder values at the last update
    last_wheels: Option<(i32, i32)>,
    /// Estimated position (cm); y is the starting direction
    position: Vector2<f32>,
    /// Last heading (rad)
    heading: f32,
}

impl Odometry {
    pub fn new(wheel_diameter: f32) -> Self {
        Self {
            wheel_circumference: wheel_diameter * PI,
            last_wheels: None,
            position: Vector2::zeros(),
            heading: 0.0,
        }
    }

    /// Fold in new cumulative encoder values and the current heading
    /// (degrees), returning the updated position
    pub fn update(&mut self, wheels: (i32, i32), heading_degrees: f32) -> Vector2<f32> {
        let (last_left, last_right) = self.last_wheels.unwrap_or(wheels);
        self.last_wheels = Some(wheels);

        let left = (wheels.0 - last_left) as f32 * self.wheel_circumference / 360.0;
        let right = (wheels.1 - last_right) as f32 * self.wheel_circumference / 360.0;

        let distance = (left + right) / 2.0;
        self.heading = heading_degrees.to_radians();

        self.position += Vector2::new(distance * sinf(self.heading), distance * cosf(self.heading));
        self.position
    }

    pub fn position(&self) -> Vector2<f32> {
        self.position
    }

    /// Last heading in radians
    pub fn heading(&self) -> f32 {
        self.heading
    }
}

impl Default for Odometry {
    fn default() -> Self {
        Self::new(WHEEL_DIAMETER)
    }
}
