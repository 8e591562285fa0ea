//!
//! Escalating oscillation used to find a lost line
//!
//! For every amplitude `a` the robot turns out to `-a`, sweeps through the
//! center to `+2a` (relative to the outward extreme, so it ends at `+a`), and
//! returns by `-a` to where it started.  The heading reference is reset before
//! each of the three sub-moves.  Small amplitudes come first, so a line lost
//! on a gentle curve is found without a wide sweep.
//!

/// One of the three turns made for each amplitude
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubMove {
    /// Counter-clockwise to `-amplitude`
    Outward,
    /// Clockwise to `+2 * amplitude`
    Sweep,
    /// Counter-clockwise back to `-amplitude`
    Return,
}

impl SubMove {
    /// Relative heading that ends this sub-move
    pub fn target(self, amplitude: f32) -> f32 {
        match self {
            Self::Outward | Self::Return => -amplitude,
            Self::Sweep => 2.0 * amplitude,
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::Outward => Some(Self::Sweep),
            Self::Sweep => Some(Self::Return),
            Self::Return => None,
        }
    }
}

/// A single heading-bounded turn of the search
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchStep {
    /// Index of the amplitude in the configured sequence
    pub index: usize,
    /// Amplitude in degrees
    pub amplitude: f32,
    pub sub_move: SubMove,
}

impl SearchStep {
    /// Relative heading that ends this step
    pub fn target(&self) -> f32 {
        self.sub_move.target(self.amplitude)
    }
}

/// How a search ended
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchOutcome {
    /// The line or a marker was seen during `step`
    Reacquired { step: SearchStep },
    /// Every amplitude was swept without seeing the line
    Exhausted,
}

/// Iterator over the steps of an oscillating search
#[derive(Clone, Debug)]
pub struct SearchPattern<'a> {
    angles: &'a [f32],
    index: usize,
    sub_move: SubMove,
}

impl<'a> SearchPattern<'a> {
    pub fn new(angles: &'a [f32]) -> Self {
        Self {
            angles,
            index: 0,
            sub_move: SubMove::Outward,
        }
    }

    /// Number of amplitudes in the pattern
    pub fn amplitudes(&self) -> usize {
        self.angles.len()
    }
}

impl Iterator for SearchPattern<'_> {
    type Item = SearchStep;

    fn next(&mut self) -> Option<Self::Item> {
        let amplitude = *self.angles.get(self.index)?;
        let step = SearchStep {
            index: self.index,
            amplitude,
            sub_move: self.sub_move,
        };

        match self.sub_move.next() {
            Some(sub_move) => self.sub_move = sub_move,
            None => {
                self.sub_move = SubMove::Outward;
                self.index += 1;
            }
        }

        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let done = match self.sub_move {
            SubMove::Outward => 0,
            SubMove::Sweep => 1,
            SubMove::Return => 2,
        };
        let remaining = (self.angles.len().saturating_sub(self.index) * 3).saturating_sub(done);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;

    #[test]
    fn test_three_sub_moves_per_amplitude() {
        let steps: Vec<_> = SearchPattern::new(&[30.0, 60.0]).collect();

        let targets: Vec<_> = steps.iter().map(|step| step.target()).collect();
        assert_eq!(targets, [-30.0, 60.0, -30.0, -60.0, 120.0, -60.0]);

        let sub_moves: Vec<_> = steps.iter().map(|step| step.sub_move).collect();
        assert_eq!(
            sub_moves,
            [
                SubMove::Outward,
                SubMove::Sweep,
                SubMove::Return,
                SubMove::Outward,
                SubMove::Sweep,
                SubMove::Return,
            ],
        );
        assert_eq!(steps[4].index, 1);
    }

    #[test]
    fn test_pattern_ends_after_last_amplitude() {
        let angles = [30.0, 60.0, 90.0, 120.0, 150.0, 180.0];
        let mut pattern = SearchPattern::new(&angles);
        assert_eq!(pattern.amplitudes(), 6);
        assert_eq!(pattern.size_hint(), (18, Some(18)));

        let last = pattern.by_ref().last().unwrap();
        assert_eq!(last.amplitude, 180.0);
        assert_eq!(last.sub_move, SubMove::Return);
        assert_eq!(pattern.next(), None);
    }

    #[test]
    fn test_heading_is_neutral_after_each_amplitude() {
        let steps: Vec<_> = SearchPattern::new(&[10.0, 30.0, 90.0, 120.0]).collect();

        for amplitude in steps.chunks(3) {
            let net: f32 = amplitude.iter().map(|step| step.target()).sum();
            assert_eq!(net, 0.0);
        }
    }

    #[test]
    fn test_empty_pattern() {
        assert_eq!(SearchPattern::new(&[]).next(), None);
    }
}
