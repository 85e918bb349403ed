//! Bounded telemetry history.

use crate::models::Sample;
use std::collections::VecDeque;

/// Default number of samples kept in history.
pub const DEFAULT_CAPACITY: usize = 20;

/// Fixed-capacity FIFO of the most recent samples, oldest first.
#[derive(Debug, Clone)]
pub struct TelemetryBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Default for TelemetryBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl TelemetryBuffer {
    /// Create a buffer holding at most `capacity` samples (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest entries on overflow.
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// The most recently appended sample.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// The last `min(n, len)` samples in chronological order.
    pub fn window(&self, n: usize) -> Vec<Sample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Sample {
        Sample::new(format!("t{}", n), 80.0, n as f64 % 15.0, 40.0, 50.0)
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = TelemetryBuffer::default();
        assert!(buffer.is_empty());
        assert!(buffer.latest().is_none());
        assert!(buffer.window(10).is_empty());
        assert_eq!(buffer.capacity(), 20);
    }

    #[test]
    fn test_latest_tracks_last_append() {
        let mut buffer = TelemetryBuffer::default();
        buffer.append(numbered(1));
        buffer.append(numbered(2));

        assert_eq!(buffer.latest().map(|s| s.timestamp.as_str()), Some("t2"));
    }

    #[test]
    fn test_evicts_oldest_on_overflow() {
        let mut buffer = TelemetryBuffer::default();
        for i in 1..=21 {
            buffer.append(numbered(i));
        }

        assert_eq!(buffer.len(), 20);
        assert_eq!(
            buffer.iter().next().map(|s| s.timestamp.as_str()),
            Some("t2")
        );
    }

    #[test]
    fn test_window_after_25_appends() {
        let mut buffer = TelemetryBuffer::default();
        for i in 1..=25 {
            buffer.append(numbered(i));
        }

        let window = buffer.window(20);
        let labels: Vec<String> = window.into_iter().map(|s| s.timestamp).collect();
        let expected: Vec<String> = (6..=25).map(|i| format!("t{}", i)).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_window_shorter_than_request() {
        let mut buffer = TelemetryBuffer::default();
        for i in 1..=3 {
            buffer.append(numbered(i));
        }

        assert_eq!(buffer.window(10).len(), 3);
        let last_two: Vec<String> = buffer.window(2).into_iter().map(|s| s.timestamp).collect();
        assert_eq!(last_two, vec!["t2", "t3"]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut buffer = TelemetryBuffer::with_capacity(0);
        buffer.append(numbered(1));
        buffer.append(numbered(2));
        assert_eq!(buffer.len(), 1);
    }
}
