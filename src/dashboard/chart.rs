use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::quantity::{power::Watts, voltage::Volts};

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    pub at: DateTime<Local>,
    pub voltage: Volts,
    pub power: Watts,
}

/// Rolling window of the most recent telemetry samples, oldest first.
#[must_use]
#[derive(Clone, Debug)]
pub struct ChartBuffer {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl Default for ChartBuffer {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl ChartBuffer {
    pub const DEFAULT_CAPACITY: usize = 20;

    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, samples: VecDeque::with_capacity(capacity + 1) }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Lowest and highest voltage in the window.
    #[must_use]
    pub fn voltage_range(&self) -> Option<(Volts, Volts)> {
        let min = self.iter().map(|sample| sample.voltage).min()?;
        let max = self.iter().map(|sample| sample.voltage).max()?;
        Some((min, max))
    }

    /// Lowest and highest power in the window.
    #[must_use]
    pub fn power_range(&self) -> Option<(Watts, Watts)> {
        let min = self.iter().map(|sample| sample.power).min()?;
        let max = self.iter().map(|sample| sample.power).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use itertools::Itertools;

    use super::*;

    fn sample(second: u32, voltage: f64) -> Sample {
        Sample {
            at: Local.with_ymd_and_hms(2026, 10, 19, 12, 0, second).unwrap(),
            voltage: Volts(voltage),
            power: Watts(voltage * 2.0),
        }
    }

    #[test]
    fn test_evicts_oldest() {
        let mut buffer = ChartBuffer::with_capacity(3);
        for second in 0..5 {
            buffer.push(sample(second, f64::from(second)));
        }
        assert_eq!(buffer.len(), 3);
        let voltages = buffer.iter().map(|sample| sample.voltage.0).collect_vec();
        assert_eq!(voltages, [2.0, 3.0, 4.0]);
        assert_eq!(buffer.latest().map(|sample| sample.voltage), Some(Volts(4.0)));
    }

    #[test]
    fn test_default_capacity() {
        let mut buffer = ChartBuffer::default();
        for second in 0..30 {
            buffer.push(sample(second, 230.0));
        }
        assert_eq!(buffer.len(), ChartBuffer::DEFAULT_CAPACITY);
    }

    #[test]
    fn test_ranges() {
        let mut buffer = ChartBuffer::default();
        assert_eq!(buffer.voltage_range(), None);
        buffer.push(sample(0, 231.0));
        buffer.push(sample(1, 228.5));
        buffer.push(sample(2, 229.0));
        assert_eq!(buffer.voltage_range(), Some((Volts(228.5), Volts(231.0))));
        assert_eq!(buffer.power_range(), Some((Watts(457.0), Watts(462.0))));
    }
}
