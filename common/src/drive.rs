//!
//! Commands understood by a differential drive
//!

use defmt::Format;
use ncomm_utils::packing::{Packable, PackingError};

/// The size (in bytes) of a packed drive command.
pub const DRIVE_COMMAND_SIZE: usize = 9;
/// The largest steering magnitude a drive accepts.
pub const MAX_STEERING: f32 = 100.0;

#[derive(Format, Debug, PartialEq, Clone, Copy)]
/// Commands that can be sent to the drive
pub enum DriveCommand {
    /// Drive at `speed` percent while turning by `steering`.
    ///
    /// `steering` is in `[-100, 100]`: 0 drives straight, the extremes pivot
    /// in place and the magnitude in between is proportional to turn rate.
    Steer {
        // the steering bias
        steering: f32,
        // the speed in percent of maximum
        speed: f32,
    },
    /// Stop both wheels
    Stop,
    /// Unknown command
    Unknown,
}

impl DriveCommand {
    /// Build a steering command, clamping the steering into the range the
    /// drive accepts.
    pub fn steer(steering: f32, speed: f32) -> Self {
        Self::Steer {
            steering: steering.clamp(-MAX_STEERING, MAX_STEERING),
            speed,
        }
    }
}

impl Default for DriveCommand {
    fn default() -> Self {
        Self::Stop
    }
}

impl Packable for DriveCommand {
    fn len() -> usize {
        DRIVE_COMMAND_SIZE
    }

    fn pack(self, buffer: &mut [u8]) -> Result<(), PackingError> {
        if buffer.len() < Self::len() {
            return Err(PackingError::InvalidBufferSize);
        }

        match self {
            Self::Steer { steering, speed } => {
                buffer[0] = 0x01;
                buffer[1..5].copy_from_slice(&steering.to_le_bytes());
                buffer[5..9].copy_from_slice(&speed.to_le_bytes());
            },
            Self::Stop => {
                buffer[0] = 0x02;
            },
            Self::Unknown => (),
        }

        Ok(())
    }

    fn unpack(data: &[u8]) -> Result<Self, PackingError> {
        if data.len() < Self::len() {
            return Err(PackingError::InvalidBufferSize);
        }

        match data[0] {
            0x01 => Ok(Self::Steer {
                steering: f32::from_le_bytes([data[1], data[2], data[3], data[4]]),
                speed: f32::from_le_bytes([data[5], data[6], data[7], data[8]]),
            }),
            0x02 => Ok(Self::Stop),
            _ => Ok(Self::Unknown),
        }
    }
}
