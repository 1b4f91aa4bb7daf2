//! Simulated motion tracker
//!
//! Produces a smooth 2-D motion vector from two slow sinusoids with random
//! frequencies and phases, nudged now and then to change direction.

use std::f64::consts::TAU;

use super::sensor::{round_to, SensorCore};
use super::{Sensor, SensorData, SensorKind, SensorParams};

const DEFAULT_NOISE: f64 = 0.1;
const DEFAULT_UPDATE_RATE: u32 = 30;

const TIME_STEP: f64 = 0.05;
const AMPLITUDE: f64 = 0.8;
/// Per-read probability of a phase jolt
const JOLT_CHANCE: f64 = 0.02;

/// Motion tracker simulation (optical flow / accelerometer style)
pub struct MotionSensor {
    core: SensorCore,
    phase_x: f64,
    phase_y: f64,
    freq_x: f64,
    freq_y: f64,
}

impl MotionSensor {
    pub fn new(noise: f64, update_rate: u32, seed: Option<u64>) -> Self {
        let mut core = SensorCore::new(noise, update_rate, seed);
        let phase_x = core.uniform(0.0, TAU);
        let phase_y = core.uniform(0.0, TAU);
        let freq_x = core.uniform(0.3, 0.7);
        let freq_y = core.uniform(0.2, 0.5);
        Self {
            core,
            phase_x,
            phase_y,
            freq_x,
            freq_y,
        }
    }

    pub fn from_params(params: &SensorParams) -> Self {
        Self::new(
            params.noise.unwrap_or(DEFAULT_NOISE),
            params.update_rate.unwrap_or(DEFAULT_UPDATE_RATE),
            params.seed,
        )
    }
}

impl Sensor for MotionSensor {
    fn kind(&self) -> SensorKind {
        SensorKind::Motion
    }

    fn update_rate(&self) -> u32 {
        self.core.update_rate()
    }

    fn ticks(&self) -> u64 {
        self.core.tick()
    }

    fn read(&mut self) -> SensorData {
        let t = self.core.advance() as f64 * TIME_STEP;

        let dx = (t * self.freq_x + self.phase_x).sin() * AMPLITUDE;
        let dy = (t * self.freq_y + self.phase_y).cos() * AMPLITUDE;

        if self.core.chance(JOLT_CHANCE) {
            self.phase_x += self.core.uniform(-0.5, 0.5);
            self.phase_y += self.core.uniform(-0.5, 0.5);
        }

        let dx = self.core.add_noise_unbounded(dx);
        let dy = self.core.add_noise_unbounded(dy);
        let magnitude = (dx * dx + dy * dy).sqrt();

        SensorData::new(SensorKind::Motion.name())
            .with_value("dx", round_to(dx, 4))
            .with_value("dy", round_to(dy, 4))
            .with_value("magnitude", round_to(magnitude, 4))
    }
}
