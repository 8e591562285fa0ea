//!
//! Wire types shared between the line tracking core, the drive
//! board and whatever records the robot's path.
//!

#![no_std]

pub mod drive;
pub use drive::*;

pub mod track;
pub use track::*;
