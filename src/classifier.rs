//!
//! Debounced color classification over the sample buffer
//!
//! Each predicate is read-only: it looks at whatever the buffer holds and
//! never takes a reading itself.  The windows are deliberately uneven.  A
//! missed target or marker only costs one more tick of following, while a
//! false background call drops the robot into a full search, so background
//! needs the longest unanimous run.
//!
//! Until the buffer has filled once, target and background degrade to a test
//! of the latest reading alone.
//!

use crate::config::ControllerConfig;
use crate::samples::{Reflectance, SampleBuffer};

/// The classification of the floor under the sensor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorZone {
    /// The line being followed
    Target,
    /// A transverse marker crossing the line
    Marker,
    /// The floor around the line
    Background,
    /// None of the above with enough confidence
    Ambiguous,
}

/// Threshold and window rules taken from a [`ControllerConfig`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorClassifier {
    target_max: Reflectance,
    marker_band: Option<(Reflectance, Reflectance)>,
    background_min: Reflectance,
    target_window: usize,
    background_window: usize,
    marker_window: usize,
    marker_quorum: usize,
}

impl ColorClassifier {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            target_max: config.target_max,
            marker_band: config.marker_band,
            background_min: config.background_min,
            target_window: config.target_window,
            background_window: config.background_window,
            marker_window: config.marker_window,
            marker_quorum: config.marker_quorum,
        }
    }

    /// Is the sensor over the line?
    ///
    /// Once the buffer is full, every one of the last `target_window`
    /// readings must be at or below `target_max`.
    pub fn is_target<const N: usize>(&self, samples: &SampleBuffer<N>) -> bool {
        unanimous(samples, self.target_window, |value| value <= self.target_max)
    }

    /// Is the sensor crossing a marker?
    ///
    /// The latest reading must be in the marker band and at least
    /// `marker_quorum` of the last `marker_window` readings (the latest
    /// included) must be in it too.
    pub fn is_marker<const N: usize>(&self, samples: &SampleBuffer<N>) -> bool {
        let Some((min, max)) = self.marker_band else {
            return false;
        };
        let in_band = |value: Reflectance| min <= value && value <= max;

        match samples.latest() {
            Some(latest) if in_band(latest) => {
                samples
                    .recent(self.marker_window)
                    .filter(|&value| in_band(value))
                    .count()
                    >= self.marker_quorum
            }
            _ => false,
        }
    }

    /// Has the line been lost?
    ///
    /// Once the buffer is full, every one of the last `background_window`
    /// readings must be at or above `background_min`.
    pub fn is_background<const N: usize>(&self, samples: &SampleBuffer<N>) -> bool {
        unanimous(samples, self.background_window, |value| value >= self.background_min)
    }

    /// Whether a search may stop: the line or a marker is back under the sensor
    pub fn is_reacquired<const N: usize>(&self, samples: &SampleBuffer<N>) -> bool {
        self.is_target(samples) || self.is_marker(samples)
    }

    /// Classify the buffer, checking the zones in the order the follower
    /// acts on them: background, marker, then target
    pub fn classify<const N: usize>(&self, samples: &SampleBuffer<N>) -> ColorZone {
        if self.is_background(samples) {
            ColorZone::Background
        } else if self.is_marker(samples) {
            ColorZone::Marker
        } else if self.is_target(samples) {
            ColorZone::Target
        } else {
            ColorZone::Ambiguous
        }
    }
}

fn unanimous<const N: usize>(
    samples: &SampleBuffer<N>,
    window: usize,
    predicate: impl Fn(Reflectance) -> bool,
) -> bool {
    if samples.is_full() {
        samples.recent(window).all(predicate)
    } else {
        samples.latest().map_or(false, predicate)
    }
}
