//!
//! Position log emitted while tracking
//!
//! The log is a pure observer: the controller hands records out and never
//! reads them back.  `Moving` records are throttled to one per interval;
//! marker, program start and program end records always go out.
//!

use common::{PositionRecord, TrackState};
use nalgebra::base::*;

use crate::clock::{Clock, Throttle};
use crate::odometry::{Odometry, WheelEncoders};
use crate::samples::Reflectance;

/// Where position records go
pub trait Telemetry {
    /// Milliseconds since the program started
    fn elapsed_ms(&mut self) -> u32;

    /// The current position estimate
    fn position(&mut self) -> Vector2<f32>;

    /// Hand a finished record to the log
    fn emit(&mut self, record: PositionRecord);
}

/// No telemetry: records are dropped
impl Telemetry for () {
    fn elapsed_ms(&mut self) -> u32 {
        0
    }

    fn position(&mut self) -> Vector2<f32> {
        Vector2::zeros()
    }

    fn emit(&mut self, _record: PositionRecord) {}
}

/// Writes finished records somewhere (a file, a radio, a ring buffer)
pub trait RecordSink {
    fn write(&mut self, record: &PositionRecord);
}

/// Telemetry that dead-reckons its position from wheel encoders
pub struct OdometryTelemetry<E, C, W> {
    encoders: E,
    clock: C,
    sink: W,
    odometry: Odometry,
}

impl<E: WheelEncoders, C: Clock, W: RecordSink> OdometryTelemetry<E, C, W> {
    pub fn new(encoders: E, clock: C, sink: W, odometry: Odometry) -> Self {
        Self {
            encoders,
            clock,
            sink,
            odometry,
        }
    }

    /// Free the underlying peripherals and sink
    pub fn destroy(self) -> (E, C, W) {
        (self.encoders, self.clock, self.sink)
    }
}

impl<E: WheelEncoders, C: Clock, W: RecordSink> Telemetry for OdometryTelemetry<E, C, W> {
    fn elapsed_ms(&mut self) -> u32 {
        self.clock.elapsed_ms()
    }

    fn position(&mut self) -> Vector2<f32> {
        let wheels = self.encoders.wheel_degrees();
        let heading = self.encoders.heading_degrees();

        match (wheels, heading) {
            (Ok(wheels), Ok(heading)) => self.odometry.update(wheels, heading),
            (Err(err), _) => {
                log::warn!("Unable to read wheel encoders: {:?}", err);
                self.odometry.position()
            }
            (_, Err(err)) => {
                log::warn!("Unable to read tracking gyro: {:?}", err);
                self.odometry.position()
            }
        }
    }

    fn emit(&mut self, record: PositionRecord) {
        self.sink.write(&record);
    }
}

/// Builds records and applies the minimum spacing between them
pub struct PositionLog<T> {
    telemetry: T,
    throttle: Throttle,
}

impl<T: Telemetry> PositionLog<T> {
    pub fn new(telemetry: T, interval_ms: u32) -> Self {
        Self {
            telemetry,
            throttle: Throttle::new(interval_ms),
        }
    }

    /// Record `state` unless a throttled record went out within the interval.
    ///
    /// Returns whether a record was emitted.
    pub fn record(&mut self, state: TrackState, reflectance: Reflectance) -> bool {
        let now = self.telemetry.elapsed_ms();
        if !self.throttle.ready(now) {
            return false;
        }
        self.emit_at(now, state, reflectance);
        true
    }

    /// Record `state` regardless of the interval
    pub fn record_now(&mut self, state: TrackState, reflectance: Reflectance) {
        let now = self.telemetry.elapsed_ms();
        self.emit_at(now, state, reflectance);
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    pub fn into_inner(self) -> T {
        self.telemetry
    }

    fn emit_at(&mut self, elapsed_ms: u32, state: TrackState, reflectance: Reflectance) {
        let position = self.telemetry.position();
        self.telemetry.emit(PositionRecord {
            elapsed_ms,
            x: position[0],
            y: position[1],
            state,
            reflectance,
        });
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::convert::Infallible;
    use std::vec::Vec;

    use super::*;

    struct Encoders {
        wheels: (i32, i32),
    }

    impl WheelEncoders for Encoders {
        type Error = Infallible;

        fn wheel_degrees(&mut self) -> Result<(i32, i32), Self::Error> {
            let wheels = self.wheels;
            self.wheels = (wheels.0 + 360, wheels.1 + 360);
            Ok(wheels)
        }

        fn heading_degrees(&mut self) -> Result<f32, Self::Error> {
            Ok(0.0)
        }
    }

    struct StepClock {
        now: u32,
        step: u32,
    }

    impl Clock for StepClock {
        fn elapsed_ms(&mut self) -> u32 {
            let now = self.now;
            self.now += self.step;
            now
        }
    }

    #[derive(Default)]
    struct Records(Vec<PositionRecord>);

    impl RecordSink for Records {
        fn write(&mut self, record: &PositionRecord) {
            self.0.push(*record);
        }
    }

    fn telemetry(step: u32) -> OdometryTelemetry<Encoders, StepClock, Records> {
        OdometryTelemetry::new(
            Encoders { wheels: (0, 0) },
            StepClock { now: 0, step },
            Records::default(),
            Odometry::default(),
        )
    }

    #[test]
    fn test_throttled_records_are_spaced() {
        let mut log = PositionLog::new(telemetry(40), 100);

        let emitted: Vec<bool> = (0..6).map(|_| log.record(TrackState::Moving, 12)).collect();

        // Clock reads 0, 40, 80, 120, 160, 200
        assert_eq!(emitted, [true, false, false, true, false, false]);
        let (_, _, records) = log.into_inner().destroy();
        assert_eq!(records.0.len(), 2);
        assert_eq!(records.0[1].elapsed_ms, 120);
    }

    #[test]
    fn test_record_now_bypasses_throttle() {
        let mut log = PositionLog::new(telemetry(1), 100);

        assert!(log.record(TrackState::Moving, 10));
        log.record_now(TrackState::ProgramEnd, 40);

        let (_, _, records) = log.into_inner().destroy();
        assert_eq!(records.0.len(), 2);
        assert_eq!(records.0[1].state, TrackState::ProgramEnd);
        assert_eq!(records.0[1].reflectance, 40);
    }

    #[test]
    fn test_records_carry_odometry_position() {
        let mut log = PositionLog::new(telemetry(100), 100);

        log.record_now(TrackState::ProgramStart, 10);
        log.record_now(TrackState::Moving, 10);

        let (_, _, records) = log.into_inner().destroy();
        assert_eq!(records.0[0].y, 0.0);
        assert!(records.0[1].y > 17.0 && records.0[1].y < 18.0);
        assert_eq!(records.0[1].x, 0.0);
    }

    #[test]
    fn test_unit_telemetry_drops_records() {
        let mut log = PositionLog::new((), 100);

        assert!(log.record(TrackState::Moving, 10));
        assert!(!log.record(TrackState::Moving, 10));
        log.record_now(TrackState::ProgramEnd, 10);
    }
}
