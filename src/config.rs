//!
//! Track Constants and Configuration Information
//!
//! Every threshold, window and gain that differs between robots lives in a
//! [`ControllerConfig`].  The presets reproduce the robots that have been run
//! on the track so far, and the `green-line` / `black-line` features choose
//! which one [`DEFAULT_CONFIG`] points at.
//!

use crate::samples::BUFFER_SIZE;

/// What the controller does once every search amplitude has been tried
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExhaustionPolicy {
    /// Declare a dead end and finish the program
    Halt,
    /// Stop in place and keep watching the sensor until the line reappears
    Idle,
}

/// Reasons a configuration record is rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A debounce window of zero samples
    EmptyWindow,
    /// A debounce window longer than the sample buffer
    WindowTooLarge { window: usize, capacity: usize },
    /// The marker quorum cannot be met inside the marker window
    QuorumTooLarge { quorum: usize, window: usize },
    /// The marker band's minimum is above its maximum
    InvertedMarkerBand,
    /// No search angles were given
    NoSearchAngles,
    /// Search angles must be positive and strictly increasing
    UnorderedSearchAngles,
    /// The control loop needs a non-zero period
    ZeroTickPeriod,
}

/// Tunable constants for one robot/track combination
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Readings at or below this are the line color
    pub target_max: u16,
    /// Inclusive reflectance band of a transverse marker, if the track has any
    pub marker_band: Option<(u16, u16)>,
    /// Readings at or above this are the background
    pub background_min: u16,
    /// Trailing samples that must all be on target once the buffer is full
    pub target_window: usize,
    /// Trailing samples that must all be background once the buffer is full
    pub background_window: usize,
    /// Trailing samples considered for a marker vote
    pub marker_window: usize,
    /// In-band votes needed inside `marker_window`
    pub marker_quorum: usize,
    /// Reflectance the steering law steers towards
    pub steering_center: f32,
    /// Steering per unit of reflectance error (sign picks the line edge)
    pub steering_gain: f32,
    /// Speed while following the line (percent)
    pub forward_speed: f32,
    /// Speed of the in-place turn on the first marker (percent)
    pub turn_speed: f32,
    /// Heading at which the first-marker turn is considered complete
    pub turn_target_degrees: f32,
    /// Pause after stopping on the first marker (ms)
    pub settle_ms: u32,
    /// Straight creep after the first-marker turn (ms)
    pub creep_ms: u32,
    /// Sweep amplitudes tried, in order, while searching for the line
    pub search_angles: &'static [f32],
    /// Speed of the search sweeps (percent)
    pub search_speed: f32,
    /// What to do when no amplitude found the line
    pub exhaustion: ExhaustionPolicy,
    /// Period of the control loop and of every polling loop (ms)
    pub tick_ms: u32,
    /// Give up on a turn that has not reached its heading after this long (ms)
    pub rotation_timeout_ms: Option<u32>,
    /// Minimum spacing between throttled position log records (ms)
    pub log_interval_ms: u32,
}

impl ControllerConfig {
    /// Green line on white with two grey transverse markers
    pub const GREEN_LINE: Self = Self {
        target_max: 20,
        marker_band: Some((30, 45)),
        background_min: 55,
        target_window: 7,
        background_window: 12,
        marker_window: 5,
        marker_quorum: 3,
        steering_center: 10.0,
        steering_gain: 1.0,
        forward_speed: 35.0,
        turn_speed: 20.0,
        turn_target_degrees: 345.0,
        settle_ms: 300,
        creep_ms: 300,
        search_angles: &[30.0, 60.0, 90.0, 120.0, 150.0, 180.0],
        search_speed: 20.0,
        exhaustion: ExhaustionPolicy::Idle,
        tick_ms: 10,
        rotation_timeout_ms: Some(15_000),
        log_interval_ms: 100,
    };

    /// Black line on white, no markers, dead ends end the run
    pub const BLACK_LINE: Self = Self {
        target_max: 15,
        marker_band: None,
        background_min: 50,
        target_window: 1,
        background_window: 1,
        marker_window: 5,
        marker_quorum: 3,
        steering_center: 50.5,
        steering_gain: -0.1,
        forward_speed: 40.0,
        turn_speed: 25.0,
        turn_target_degrees: 345.0,
        settle_ms: 300,
        creep_ms: 300,
        search_angles: &[10.0, 30.0, 90.0, 120.0],
        search_speed: 25.0,
        exhaustion: ExhaustionPolicy::Halt,
        tick_ms: 10,
        rotation_timeout_ms: Some(15_000),
        log_interval_ms: 100,
    };

    /// Check the record against a sample buffer of `capacity` readings
    pub fn validate(&self, capacity: usize) -> Result<(), ConfigError> {
        for window in [self.target_window, self.background_window, self.marker_window] {
            if window == 0 {
                return Err(ConfigError::EmptyWindow);
            }
            if window > capacity {
                return Err(ConfigError::WindowTooLarge { window, capacity });
            }
        }

        if self.marker_quorum == 0 || self.marker_quorum > self.marker_window {
            return Err(ConfigError::QuorumTooLarge {
                quorum: self.marker_quorum,
                window: self.marker_window,
            });
        }

        if let Some((min, max)) = self.marker_band {
            if min > max {
                return Err(ConfigError::InvertedMarkerBand);
            }
        }

        if self.search_angles.is_empty() {
            return Err(ConfigError::NoSearchAngles);
        }
        let mut last = 0.0;
        for &angle in self.search_angles {
            if !(angle > last) {
                return Err(ConfigError::UnorderedSearchAngles);
            }
            last = angle;
        }

        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }

        Ok(())
    }

    /// The rotation watchdog expressed in control ticks
    pub fn rotation_timeout_ticks(&self) -> Option<u32> {
        self.rotation_timeout_ms
            .map(|timeout| (timeout / self.tick_ms.max(1)).max(1))
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

/// The preset selected by the enabled track feature
#[cfg(not(feature = "black-line"))]
pub const DEFAULT_CONFIG: ControllerConfig = ControllerConfig::GREEN_LINE;

/// The preset selected by the enabled track feature
#[cfg(feature = "black-line")]
pub const DEFAULT_CONFIG: ControllerConfig = ControllerConfig::BLACK_LINE;

/// Validate the default preset against the default buffer size
pub fn default_config() -> Result<ControllerConfig, ConfigError> {
    DEFAULT_CONFIG.validate(BUFFER_SIZE)?;
    Ok(DEFAULT_CONFIG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert_eq!(ControllerConfig::GREEN_LINE.validate(BUFFER_SIZE), Ok(()));
        assert_eq!(ControllerConfig::BLACK_LINE.validate(BUFFER_SIZE), Ok(()));
        assert!(default_config().is_ok());
    }

    #[test]
    fn test_window_larger_than_buffer() {
        let config = ControllerConfig {
            background_window: 16,
            ..ControllerConfig::GREEN_LINE
        };

        assert_eq!(
            config.validate(BUFFER_SIZE),
            Err(ConfigError::WindowTooLarge { window: 16, capacity: BUFFER_SIZE }),
        );
    }

    #[test]
    fn test_quorum_outside_window() {
        let config = ControllerConfig {
            marker_quorum: 6,
            ..ControllerConfig::GREEN_LINE
        };

        assert_eq!(
            config.validate(BUFFER_SIZE),
            Err(ConfigError::QuorumTooLarge { quorum: 6, window: 5 }),
        );
    }

    #[test]
    fn test_unordered_search_angles() {
        let config = ControllerConfig {
            search_angles: &[30.0, 30.0, 90.0],
            ..ControllerConfig::GREEN_LINE
        };
        assert_eq!(config.validate(BUFFER_SIZE), Err(ConfigError::UnorderedSearchAngles));

        let config = ControllerConfig {
            search_angles: &[],
            ..ControllerConfig::GREEN_LINE
        };
        assert_eq!(config.validate(BUFFER_SIZE), Err(ConfigError::NoSearchAngles));
    }

    #[test]
    fn test_inverted_marker_band() {
        let config = ControllerConfig {
            marker_band: Some((45, 30)),
            ..ControllerConfig::GREEN_LINE
        };

        assert_eq!(config.validate(BUFFER_SIZE), Err(ConfigError::InvertedMarkerBand));
    }

    #[test]
    fn test_rotation_timeout_in_ticks() {
        assert_eq!(ControllerConfig::GREEN_LINE.rotation_timeout_ticks(), Some(1_500));

        let config = ControllerConfig {
            rotation_timeout_ms: None,
            ..ControllerConfig::GREEN_LINE
        };
        assert_eq!(config.rotation_timeout_ticks(), None);
    }
}
