//!
//! Sliding window of the most recent reflectance readings
//!

/// Default number of readings kept for classification
pub const BUFFER_SIZE: usize = 15;

/// A raw reflectance reading (sensor specific units)
pub type Reflectance = u16;

/// Fixed capacity FIFO of reflectance readings.
///
/// Backed by a circular array so recording never allocates; once `N`
/// readings are stored the oldest one is overwritten.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleBuffer<const N: usize = BUFFER_SIZE> {
    /// The stored readings
    values: [Reflectance; N],
    /// The index the next reading is written to
    next_idx: usize,
    /// The number of valid readings
    len: usize,
}

impl<const N: usize> SampleBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            values: [0; N],
            next_idx: 0,
            len: 0,
        }
    }

    /// Append a reading, evicting the oldest when full
    pub fn record(&mut self, value: Reflectance) {
        if N == 0 {
            return;
        }

        self.values[self.next_idx] = value;
        self.next_idx += 1;
        if self.next_idx == N {
            self.next_idx = 0;
        }
        if self.len < N {
            self.len += 1;
        }
    }

    /// The most recent reading, if any
    pub fn latest(&self) -> Option<Reflectance> {
        self.recent(1).next()
    }

    /// Up to `count` of the most recent readings, newest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = Reflectance> + '_ {
        let count = count.min(self.len);
        (1..=count).map(move |back| self.values[(self.next_idx + N - back) % N])
    }

    /// Number of stored readings
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no reading has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the buffer holds `N` readings
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// The maximum number of stored readings
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Forget every stored reading
    pub fn clear(&mut self) {
        self.next_idx = 0;
        self.len = 0;
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
