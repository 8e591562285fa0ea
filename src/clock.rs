//!
//! Clock trait for timestamping telemetry
//!
//! embedded-hal 0.2 only offers blocking delays, not a monotonic timestamp,
//! so this trait fills the gap for now.
//!

/// Monotonic time since the program started
pub trait Clock {
    /// Milliseconds elapsed since the program started
    fn elapsed_ms(&mut self) -> u32;
}

/// Gate that lets an event through at most once per interval
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throttle {
    interval_ms: u32,
    last_ms: Option<u32>,
}

impl Throttle {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Whether an event may happen at `now_ms`; marks it as happened if so
    pub fn ready(&mut self, now_ms: u32) -> bool {
        match self.last_ms {
            Some(last) if now_ms.wrapping_sub(last) < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}
