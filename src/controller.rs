//!
//! Two-mode line tracking controller
//!
//! One control thread calls [`LineFollower::tick`] at a fixed period.  While
//! following, a tick takes one reading and either steers, reacts to a marker
//! or gives up on the line.  While searching, a tick runs the oscillating
//! search until the line is back or the pattern is used up.
//!
//! The first-marker turn is blocking and cannot be cancelled: stopping half
//! way through would leave the heading unknown.  Search rotations check for
//! the line on every poll and return as soon as it is seen.
//!

use common::TrackState;
use embedded_hal::blocking::delay::DelayMs;

use crate::classifier::{ColorClassifier, ColorZone};
use crate::config::{ConfigError, ControllerConfig, ExhaustionPolicy};
use crate::errors::ControlError;
use crate::markers::{MarkerAction, MarkerCounter};
use crate::peripherals::{Drive, Sensors};
use crate::rotation::{Rotation, RotationStatus};
use crate::samples::{Reflectance, SampleBuffer, BUFFER_SIZE};
use crate::search::{SearchOutcome, SearchPattern};
use crate::steering::{SteeringCommand, SteeringLaw};
use crate::telemetry::{PositionLog, Telemetry};

/// The active control mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Steering along the line
    Following,
    /// Oscillating in place to find the line again
    Searching,
}

/// Everything the control loop mutates between ticks
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerState<const N: usize = BUFFER_SIZE> {
    pub mode: Mode,
    pub samples: SampleBuffer<N>,
    pub markers: MarkerCounter,
    /// Set once the program is over; the loop stops
    pub complete: bool,
    /// The search ran out and the robot is waiting in place
    pub exhausted: bool,
    /// The last steering command sent while following
    pub last_steering: Option<SteeringCommand>,
}

impl<const N: usize> ControllerState<N> {
    pub const fn new() -> Self {
        Self {
            mode: Mode::Following,
            samples: SampleBuffer::new(),
            markers: MarkerCounter::new(),
            complete: false,
            exhausted: false,
            last_steering: None,
        }
    }
}

impl<const N: usize> Default for ControllerState<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// How a rotation ended without error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RotationEnd {
    Reached,
    Reacquired,
}

/// The line tracking controller
pub struct LineFollower<D, S, DL, T, const N: usize = BUFFER_SIZE> {
    drive: D,
    sensors: S,
    delay: DL,
    log: PositionLog<T>,
    config: ControllerConfig,
    classifier: ColorClassifier,
    steering: SteeringLaw,
    state: ControllerState<N>,
}

impl<D, S, DL, T, const N: usize> LineFollower<D, S, DL, T, N>
where
    D: Drive,
    S: Sensors,
    DL: DelayMs<u32>,
    T: Telemetry,
{
    /// Create a controller, rejecting configs that do not fit the buffer
    pub fn new(
        drive: D,
        sensors: S,
        delay: DL,
        telemetry: T,
        config: ControllerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate(N)?;

        Ok(Self {
            drive,
            sensors,
            delay,
            log: PositionLog::new(telemetry, config.log_interval_ms),
            config,
            classifier: ColorClassifier::new(&config),
            steering: SteeringLaw::from_config(&config),
            state: ControllerState::new(),
        })
    }

    pub fn state(&self) -> &ControllerState<N> {
        &self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn is_complete(&self) -> bool {
        self.state.complete
    }

    /// Free the peripherals and telemetry
    pub fn destroy(self) -> (D, S, DL, T) {
        (self.drive, self.sensors, self.delay, self.log.into_inner())
    }

    /// Run until the program completes.
    ///
    /// The drive is told to stop on the way out whether the loop finished or
    /// failed.
    pub fn run(&mut self) -> Result<(), ControlError<D::Error, S::Error>> {
        let result = self.run_loop();
        let stopped = self.drive.stop();

        match result {
            Ok(()) => {
                log::info!("Program complete after {} markers", self.state.markers.count());
                stopped.map_err(ControlError::Drive)
            }
            Err(err) => {
                log::error!("Control loop aborted: {:?}", err);
                if let Err(stop_err) = stopped {
                    log::error!("Unable to stop the drive: {:?}", stop_err);
                }
                Err(err)
            }
        }
    }

    fn run_loop(&mut self) -> Result<(), ControlError<D::Error, S::Error>> {
        let value = self.sample()?;
        self.log.record_now(TrackState::ProgramStart, value);

        while !self.state.complete {
            self.tick()?;
            self.delay.delay_ms(self.config.tick_ms);
        }

        Ok(())
    }

    /// Run one step of the active mode
    pub fn tick(&mut self) -> Result<(), ControlError<D::Error, S::Error>> {
        if self.state.complete {
            return Ok(());
        }

        match self.state.mode {
            Mode::Following => self.follow(),
            Mode::Searching if self.state.exhausted => self.wait_for_line(),
            Mode::Searching => self.search().map(|_| ()),
        }
    }

    /// One tick of line following
    fn follow(&mut self) -> Result<(), ControlError<D::Error, S::Error>> {
        let value = self.sample()?;

        match self.classifier.classify(&self.state.samples) {
            ColorZone::Background => {
                self.log.record(TrackState::Moving, value);
                log::info!("Line lost (reflectance {}), searching", value);
                self.state.mode = Mode::Searching;
                self.state.exhausted = false;
                Ok(())
            }
            ColorZone::Marker => {
                self.log.record_now(TrackState::MarkerDetected, value);
                self.on_marker(value)
            }
            ColorZone::Target | ColorZone::Ambiguous => {
                self.log.record(TrackState::Moving, value);
                self.steer(value)
            }
        }
    }

    fn on_marker(&mut self, value: Reflectance) -> Result<(), ControlError<D::Error, S::Error>> {
        match self.state.markers.register() {
            MarkerAction::TurnAround => {
                log::info!("First marker confirmed, turning around");
                self.turn_around()
            }
            MarkerAction::Finish => {
                log::info!("Finish marker confirmed");
                self.log.record_now(TrackState::ProgramEnd, value);
                self.state.complete = true;
                self.drive.stop().map_err(ControlError::Drive)
            }
        }
    }

    /// Steer toward the line edge from the latest reading
    fn steer(&mut self, value: Reflectance) -> Result<(), ControlError<D::Error, S::Error>> {
        let command = self.steering.command(value);
        self.drive
            .set_steering(command.steering, command.speed)
            .map_err(ControlError::Drive)?;
        self.state.last_steering = Some(command);

        Ok(())
    }

    /// Stop, pivot to the configured heading, creep forward and stop again
    fn turn_around(&mut self) -> Result<(), ControlError<D::Error, S::Error>> {
        self.drive.stop().map_err(ControlError::Drive)?;
        self.delay.delay_ms(self.config.settle_ms);

        self.sensors.reset_heading().map_err(ControlError::Sensor)?;
        self.rotate(self.config.turn_target_degrees, self.config.turn_speed, false)?;

        self.drive
            .set_steering(0.0, self.config.forward_speed)
            .map_err(ControlError::Drive)?;
        self.delay.delay_ms(self.config.creep_ms);
        self.drive.stop().map_err(ControlError::Drive)?;

        log::debug!("Turn around finished");
        Ok(())
    }

    /// Run the oscillating search until the line is found or every amplitude
    /// has been swept
    pub fn search(&mut self) -> Result<SearchOutcome, ControlError<D::Error, S::Error>> {
        let angles = self.config.search_angles;

        for step in SearchPattern::new(angles) {
            log::debug!("Search amplitude {} ({:?})", step.amplitude, step.sub_move);

            self.sensors.reset_heading().map_err(ControlError::Sensor)?;
            let end = self.rotate(step.target(), self.config.search_speed, true)?;

            if end == RotationEnd::Reacquired {
                log::info!("Line reacquired at amplitude {}", step.amplitude);
                self.state.mode = Mode::Following;
                self.state.exhausted = false;
                return Ok(SearchOutcome::Reacquired { step });
            }

            self.drive.stop().map_err(ControlError::Drive)?;
        }

        self.drive.stop().map_err(ControlError::Drive)?;
        match self.config.exhaustion {
            ExhaustionPolicy::Halt => {
                log::warn!("Search exhausted, dead end");
                self.state.complete = true;
            }
            ExhaustionPolicy::Idle => {
                log::warn!("Search exhausted, waiting for the line");
                self.state.exhausted = true;
            }
        }

        Ok(SearchOutcome::Exhausted)
    }

    /// Stand still after an exhausted search until the line shows up
    fn wait_for_line(&mut self) -> Result<(), ControlError<D::Error, S::Error>> {
        self.sample()?;

        if self.classifier.is_reacquired(&self.state.samples) {
            log::info!("Line back under the sensor, following");
            self.state.exhausted = false;
            self.state.mode = Mode::Following;
        }

        Ok(())
    }

    /// Pivot until the relative heading reaches `target`.
    ///
    /// A cancellable rotation takes a reading on every poll and returns
    /// `Reacquired` as soon as the line or a marker is seen.
    fn rotate(
        &mut self,
        target: f32,
        speed: f32,
        cancellable: bool,
    ) -> Result<RotationEnd, ControlError<D::Error, S::Error>> {
        let mut rotation = Rotation::toward(target, self.config.rotation_timeout_ticks());
        self.drive
            .set_steering(rotation.direction().steering(), speed)
            .map_err(ControlError::Drive)?;

        loop {
            let heading = self.sensors.read_heading().map_err(ControlError::Sensor)?;
            match rotation.poll(heading) {
                RotationStatus::Reached => return Ok(RotationEnd::Reached),
                RotationStatus::TimedOut => {
                    log::warn!("Turn to {} stalled at {}", target, heading);
                    return Err(ControlError::RotationTimeout { target, heading });
                }
                RotationStatus::Turning => (),
            }

            if cancellable {
                self.sample()?;
                if self.classifier.is_reacquired(&self.state.samples) {
                    return Ok(RotationEnd::Reacquired);
                }
            }

            self.delay.delay_ms(self.config.tick_ms);
        }
    }

    /// Take one reading and push it into the buffer
    fn sample(&mut self) -> Result<Reflectance, ControlError<D::Error, S::Error>> {
        let value = self.sensors.read_reflectance().map_err(ControlError::Sensor)?;
        self.state.samples.record(value);
        Ok(value)
    }
}
