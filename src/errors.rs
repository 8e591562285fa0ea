//!
//! Errors that stop the control loop
//!

use core::fmt::Debug;

/// A fatal condition raised while tracking the line.
///
/// Every variant aborts the control loop; the drive is told to stop before
/// the error is handed back.
#[derive(Debug)]
pub enum ControlError<DriveError: Debug, SensorError: Debug> {
    /// The drive rejected a command
    Drive(DriveError),
    /// A sensor could not be read
    Sensor(SensorError),
    /// A turn did not reach its heading before the watchdog expired
    RotationTimeout {
        /// Relative heading the turn was aiming for
        target: f32,
        /// Last heading read before giving up
        heading: f32,
    },
}
