//!
//! Hardware seams of the line tracker
//!
//! The core never talks to motors or sensors directly.  Firmware implements
//! [`Drive`] and [`Sensors`] for its board; [`SerialDrive`] covers drive
//! boards that take packed [`DriveCommand`]s over a UART.
//!

use core::fmt::Debug;

use common::{DriveCommand, DRIVE_COMMAND_SIZE};
use embedded_hal::blocking::serial;
use ncomm_utils::packing::{Packable, PackingError};

use crate::samples::Reflectance;

/// A differential drive
pub trait Drive {
    type Error: Debug;

    /// Drive at `speed` percent with a steering bias in `[-100, 100]`
    fn set_steering(&mut self, steering: f32, speed: f32) -> Result<(), Self::Error>;

    /// Stop both wheels
    fn stop(&mut self) -> Result<(), Self::Error>;

    /// Execute a wire command
    fn apply(&mut self, command: DriveCommand) -> Result<(), Self::Error> {
        match command {
            DriveCommand::Steer { steering, speed } => self.set_steering(steering, speed),
            DriveCommand::Stop | DriveCommand::Unknown => self.stop(),
        }
    }
}

/// The reflectance sensor and gyro
pub trait Sensors {
    type Error: Debug;

    /// Read the reflected light intensity under the sensor
    fn read_reflectance(&mut self) -> Result<Reflectance, Self::Error>;

    /// Read the heading (degrees, clockwise positive) since the last reset
    fn read_heading(&mut self) -> Result<f32, Self::Error>;

    /// Zero the heading reference
    fn reset_heading(&mut self) -> Result<(), Self::Error>;
}

/// Error from driving over a serial link
#[derive(Debug)]
pub enum SerialDriveError<E: Debug> {
    /// The UART failed
    Serial(E),
    /// The command could not be packed
    Packing(PackingError),
}

/// A drive board that is sent packed [`DriveCommand`]s over a UART
pub struct SerialDrive<TX> {
    tx: TX,
    /// The last command sent
    pub last_command: DriveCommand,
}

impl<TX: serial::Write<u8, Error = E>, E: Debug> SerialDrive<TX> {
    pub fn new(tx: TX) -> Self {
        Self {
            tx,
            last_command: DriveCommand::default(),
        }
    }

    /// Free the underlying UART
    pub fn destroy(self) -> TX {
        self.tx
    }

    fn send(&mut self, command: DriveCommand) -> Result<(), SerialDriveError<E>> {
        let mut buffer = [0u8; DRIVE_COMMAND_SIZE];
        command.pack(&mut buffer).map_err(SerialDriveError::Packing)?;
        self.tx.bwrite_all(&buffer).map_err(SerialDriveError::Serial)?;
        self.tx.bflush().map_err(SerialDriveError::Serial)?;
        self.last_command = command;
        Ok(())
    }
}

impl<TX: serial::Write<u8, Error = E>, E: Debug> Drive for SerialDrive<TX> {
    type Error = SerialDriveError<E>;

    fn set_steering(&mut self, steering: f32, speed: f32) -> Result<(), Self::Error> {
        self.send(DriveCommand::steer(steering, speed))
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.send(DriveCommand::Stop)
    }
}
