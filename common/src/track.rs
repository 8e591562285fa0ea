//!
//! Position log records produced while tracking a line
//!

use core::fmt::{self, Display};
use defmt::Format;

/// Header row matching the `Display` rendering of a [`PositionRecord`].
pub const CSV_HEADER: &str = "timestamp,x,y,state,color_value";

#[derive(Format, Debug, PartialEq, Eq, Clone, Copy)]
/// What the robot was doing when a record was taken
pub enum TrackState {
    /// The control loop has just started
    ProgramStart,
    /// Following the line
    Moving,
    /// A confirmed marker crossing
    MarkerDetected,
    /// The finish marker was reached
    ProgramEnd,
}

impl TrackState {
    /// The label written to the log for this state
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProgramStart => "program_start",
            Self::Moving => "moving",
            Self::MarkerDetected => "grey_detected",
            Self::ProgramEnd => "program_end",
        }
    }
}

impl Display for TrackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Format, Debug, PartialEq, Clone, Copy)]
/// A single `(elapsed, x, y, state, reflectance)` log tuple
pub struct PositionRecord {
    /// Milliseconds since the program started
    pub elapsed_ms: u32,
    /// Estimated x position (cm)
    pub x: f32,
    /// Estimated y position (cm)
    pub y: f32,
    /// What the robot was doing
    pub state: TrackState,
    /// The reflectance reading at the time of the record
    pub reflectance: u16,
}

impl Display for PositionRecord {
    /// Renders the record as one CSV row, e.g. `00:01:02.345,1.50,-3.25,moving,12`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_seconds = self.elapsed_ms / 1_000;
        let hours = total_seconds / 3_600;
        let minutes = (total_seconds % 3_600) / 60;
        let seconds = total_seconds % 60;
        let millis = self.elapsed_ms % 1_000;

        write!(
            f,
            "{:02}:{:02}:{:02}.{:03},{:.2},{:.2},{},{}",
            hours, minutes, seconds, millis, self.x, self.y, self.state, self.reflectance,
        )
    }
}
