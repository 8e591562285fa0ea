//!
//! Control core of a line following robot
//!
//! A differential drive robot with one downward reflectance sensor and a gyro
//! follows a colored line, counts transverse markers and, when the line is
//! lost, sweeps back and forth in widening arcs until it finds it again.
//!
//! The hardware is reached only through the [`Drive`] and [`Sensors`]
//! traits, and the loop is paced with an embedded-hal delay, so the same core
//! runs on the robot and in host-side tests.
//!

#![no_std]

pub mod config;
pub use config::*;

pub mod errors;
pub use errors::*;

pub mod peripherals;
pub use peripherals::*;

pub mod clock;
pub use clock::*;

pub mod samples;
pub use samples::*;

pub mod classifier;
pub use classifier::*;

pub mod steering;
pub use steering::*;

pub mod markers;
pub use markers::*;

pub mod rotation;
pub use rotation::*;

pub mod search;
pub use search::*;

pub mod odometry;

pub mod telemetry;
pub use telemetry::*;

pub mod controller;
pub use controller::*;

#[cfg(test)]
mod mock;
