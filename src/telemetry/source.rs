//! Sample sources feeding the tick loop.
//!
//! The monitor does not care where samples come from; the scheduler pulls
//! from any [`SampleSource`]. [`SimulatedSource`] reproduces a vehicle
//! on a mixed-grip surface with uniformly random readings.

use crate::config::{Range, SimulationConfig};
use crate::models::Sample;
use anyhow::{Context, Result};
use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Anything that can produce one telemetry sample per tick.
pub trait SampleSource: Send {
    fn next_sample(&mut self) -> Sample;
}

impl<F> SampleSource for F
where
    F: FnMut() -> Sample + Send,
{
    fn next_sample(&mut self) -> Sample {
        self()
    }
}

/// Random readings within configured ranges.
pub struct SimulatedSource {
    config: SimulationConfig,
    rng: StdRng,
}

impl SimulatedSource {
    /// Fails if any configured range is empty, inverted or not finite.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config
            .validate()
            .context("Invalid simulation settings")?;

        let rng = match config.seed {
            Some(seed) => {
                debug!("Seeding simulated source with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    fn draw(&mut self, range: Range) -> f64 {
        self.rng.gen_range(range.min..range.max)
    }
}

impl SampleSource for SimulatedSource {
    fn next_sample(&mut self) -> Sample {
        let ranges = (
            self.config.wheel_speed,
            self.config.slip_ratio,
            self.config.brake_force,
            self.config.throttle_position,
        );

        Sample {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            wheel_speed: self.draw(ranges.0),
            slip_ratio: self.draw(ranges.1),
            brake_force: self.draw(ranges.2),
            throttle_position: self.draw(ranges.3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SimulatedSource {
        SimulatedSource::new(SimulationConfig {
            seed: Some(seed),
            ..SimulationConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_samples_within_configured_ranges() {
        let mut source = seeded(42);
        for _ in 0..200 {
            let s = source.next_sample();
            assert!((60.0..100.0).contains(&s.wheel_speed));
            assert!((0.0..15.0).contains(&s.slip_ratio));
            assert!((30.0..60.0).contains(&s.brake_force));
            assert!((40.0..60.0).contains(&s.throttle_position));
            assert!(s.validate().is_ok());
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = seeded(9);
        let mut b = seeded(9);
        for _ in 0..10 {
            assert_eq!(a.next_sample().slip_ratio, b.next_sample().slip_ratio);
        }
    }

    #[test]
    fn test_rejects_inverted_range() {
        let config = SimulationConfig {
            slip_ratio: Range::new(15.0, 0.0),
            ..SimulationConfig::default()
        };
        let err = SimulatedSource::new(config).err().unwrap();
        assert!(format!("{:#}", err).contains("slip_ratio"));

        let empty = SimulationConfig {
            brake_force: Range::new(40.0, 40.0),
            ..SimulationConfig::default()
        };
        assert!(SimulatedSource::new(empty).is_err());
    }

    #[test]
    fn test_closure_source() {
        let mut count = 0.0;
        let mut source = move || {
            count += 1.0;
            Sample::new("fixed", 80.0, count, 40.0, 50.0)
        };
        assert_eq!(source.next_sample().slip_ratio, 1.0);
        assert_eq!(source.next_sample().slip_ratio, 2.0);
    }
}
