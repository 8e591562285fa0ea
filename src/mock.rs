//!
//! Simulated robot used by the controller tests
//!
//! All four peripherals share one [`World`].  The gyro advances on every
//! heading read in proportion to the steering last commanded, and the
//! reflectance sensor plays back a script before falling back to a default
//! reading.
//!

extern crate std;

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use common::{DriveCommand, PositionRecord};
use embedded_hal::blocking::delay::DelayMs;
use nalgebra::base::*;

use crate::peripherals::{Drive, Sensors};
use crate::samples::Reflectance;
use crate::telemetry::Telemetry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

struct Inner {
    commands: Vec<DriveCommand>,
    steering: f32,
    heading: f32,
    degrees_per_read: f32,
    heading_resets: usize,
    script: VecDeque<Reflectance>,
    default_reflectance: Reflectance,
    reflectance_reads: usize,
    fail_after: Option<usize>,
    elapsed_ms: u32,
    records: Vec<PositionRecord>,
}

/// Shared state of the simulated robot
#[derive(Clone)]
pub struct World(Rc<RefCell<Inner>>);

impl World {
    pub fn new(default_reflectance: Reflectance) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            commands: Vec::new(),
            steering: 0.0,
            heading: 0.0,
            degrees_per_read: 10.0,
            heading_resets: 0,
            script: VecDeque::new(),
            default_reflectance,
            reflectance_reads: 0,
            fail_after: None,
            elapsed_ms: 0,
            records: Vec::new(),
        })))
    }

    pub fn peripherals(&self) -> (MockDrive, MockSensors, MockDelay, MockTelemetry) {
        (
            MockDrive(self.clone()),
            MockSensors(self.clone()),
            MockDelay(self.clone()),
            MockTelemetry(self.clone()),
        )
    }

    /// Queue readings to be returned before the default one
    pub fn script(&self, values: &[Reflectance]) {
        self.0.borrow_mut().script.extend(values.iter().copied());
    }

    pub fn set_default_reflectance(&self, value: Reflectance) {
        self.0.borrow_mut().default_reflectance = value;
    }

    /// Degrees the gyro moves per read at full steering
    pub fn set_degrees_per_read(&self, degrees: f32) {
        self.0.borrow_mut().degrees_per_read = degrees;
    }

    /// Fail every reflectance read after the first `reads`
    pub fn fail_reflectance_after(&self, reads: usize) {
        self.0.borrow_mut().fail_after = Some(reads);
    }

    pub fn commands(&self) -> Vec<DriveCommand> {
        self.0.borrow().commands.clone()
    }

    pub fn heading(&self) -> f32 {
        self.0.borrow().heading
    }

    pub fn heading_resets(&self) -> usize {
        self.0.borrow().heading_resets
    }

    pub fn records(&self) -> Vec<PositionRecord> {
        self.0.borrow().records.clone()
    }
}

pub struct MockDrive(World);

impl Drive for MockDrive {
    type Error = MockError;

    fn set_steering(&mut self, steering: f32, speed: f32) -> Result<(), Self::Error> {
        let mut inner = self.0 .0.borrow_mut();
        inner.steering = steering;
        inner.commands.push(DriveCommand::Steer { steering, speed });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        let mut inner = self.0 .0.borrow_mut();
        inner.steering = 0.0;
        inner.commands.push(DriveCommand::Stop);
        Ok(())
    }
}

pub struct MockSensors(World);

impl Sensors for MockSensors {
    type Error = MockError;

    fn read_reflectance(&mut self) -> Result<Reflectance, Self::Error> {
        let mut inner = self.0 .0.borrow_mut();
        if let Some(limit) = inner.fail_after {
            if inner.reflectance_reads >= limit {
                return Err(MockError);
            }
        }
        inner.reflectance_reads += 1;

        let default = inner.default_reflectance;
        Ok(inner.script.pop_front().unwrap_or(default))
    }

    fn read_heading(&mut self) -> Result<f32, Self::Error> {
        let mut inner = self.0 .0.borrow_mut();
        let delta = inner.steering / 100.0 * inner.degrees_per_read;
        inner.heading += delta;
        Ok(inner.heading)
    }

    fn reset_heading(&mut self) -> Result<(), Self::Error> {
        let mut inner = self.0 .0.borrow_mut();
        inner.heading = 0.0;
        inner.heading_resets += 1;
        Ok(())
    }
}

pub struct MockDelay(World);

impl DelayMs<u32> for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.0 .0.borrow_mut().elapsed_ms += ms;
    }
}

pub struct MockTelemetry(World);

impl Telemetry for MockTelemetry {
    fn elapsed_ms(&mut self) -> u32 {
        self.0 .0.borrow().elapsed_ms
    }

    fn position(&mut self) -> Vector2<f32> {
        Vector2::zeros()
    }

    fn emit(&mut self, record: PositionRecord) {
        self.0 .0.borrow_mut().records.push(record);
    }
}
