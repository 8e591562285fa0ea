//!
//! Counter for confirmed marker crossings
//!
//! The first marker is a mid-course waypoint where the robot turns around in
//! place; the second is the finish line.  Debouncing happens in the
//! classifier, so every call to [`MarkerCounter::register`] is one real
//! crossing.
//!

/// Where the robot is along the marked segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MarkerState {
    /// No marker crossed yet
    #[default]
    NoneSeen,
    /// The waypoint marker has been crossed
    FirstSeen,
    /// The finish marker has been crossed (absorbing)
    Terminal,
}

/// What the controller has to do about a confirmed marker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerAction {
    /// Turn in place, creep forward and stop
    TurnAround,
    /// Stop and finish the program
    Finish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MarkerCounter {
    count: u32,
    state: MarkerState,
}

impl MarkerCounter {
    pub const fn new() -> Self {
        Self {
            count: 0,
            state: MarkerState::NoneSeen,
        }
    }

    /// Record one confirmed crossing and return the action it triggers
    pub fn register(&mut self) -> MarkerAction {
        self.count = self.count.saturating_add(1);

        match self.state {
            MarkerState::NoneSeen => {
                self.state = MarkerState::FirstSeen;
                MarkerAction::TurnAround
            }
            MarkerState::FirstSeen | MarkerState::Terminal => {
                self.state = MarkerState::Terminal;
                MarkerAction::Finish
            }
        }
    }

    /// The number of confirmed crossings so far
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn state(&self) -> MarkerState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state == MarkerState::Terminal
    }
}
