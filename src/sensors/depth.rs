//! Simulated depth camera
//!
//! Produces a 2-D depth field in [0, 1] (0 = closest, 1 = farthest) with a
//! person-shaped blob wandering across it.

use super::sensor::{round_to, SensorCore};
use super::{Sensor, SensorData, SensorKind, SensorParams};

const DEFAULT_WIDTH: usize = 40;
const DEFAULT_HEIGHT: usize = 20;
const DEFAULT_NOISE: f64 = 0.05;
const DEFAULT_UPDATE_RATE: u32 = 30;

/// Blob is taller than wide
const BLOB_RADIUS_X: f64 = 3.0;
const BLOB_RADIUS_Y: f64 = 5.0;

/// Cells kept between the blob centre and the field edge
const EDGE_MARGIN: f64 = 2.0;

/// Depth camera simulation (RealSense / Kinect style)
pub struct DepthSensor {
    core: SensorCore,
    width: usize,
    height: usize,
    blob_x: f64,
    blob_y: f64,
    blob_vx: f64,
    blob_vy: f64,
}

impl DepthSensor {
    /// Create a depth sensor with the given resolution
    pub fn new(width: usize, height: usize, noise: f64, update_rate: u32, seed: Option<u64>) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            core: SensorCore::new(noise, update_rate, seed),
            width,
            height,
            blob_x: width as f64 / 2.0,
            blob_y: height as f64 / 2.0,
            blob_vx: 0.0,
            blob_vy: 0.0,
        }
    }

    pub fn from_params(params: &SensorParams) -> Self {
        Self::new(
            params.width.unwrap_or(DEFAULT_WIDTH),
            params.height.unwrap_or(DEFAULT_HEIGHT),
            params.noise.unwrap_or(DEFAULT_NOISE),
            params.update_rate.unwrap_or(DEFAULT_UPDATE_RATE),
            params.seed,
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Current blob centre in cell coordinates
    pub fn blob_position(&self) -> (f64, f64) {
        (self.blob_x, self.blob_y)
    }

    /// Advance the blob one tick: random acceleration, damping, bounce
    fn step_blob(&mut self) {
        self.blob_vx += self.core.gauss(0.3);
        self.blob_vy += self.core.gauss(0.3);

        self.blob_vx *= 0.9;
        self.blob_vy *= 0.9;

        self.blob_x += self.blob_vx;
        self.blob_y += self.blob_vy;

        let max_x = self.width as f64 - 3.0;
        let max_y = self.height as f64 - 3.0;

        if self.blob_x < EDGE_MARGIN || self.blob_x > max_x {
            self.blob_vx = -self.blob_vx;
            self.blob_x = self.blob_x.min(max_x).max(EDGE_MARGIN);
        }
        if self.blob_y < EDGE_MARGIN || self.blob_y > max_y {
            self.blob_vy = -self.blob_vy;
            self.blob_y = self.blob_y.min(max_y).max(EDGE_MARGIN);
        }
    }
}

impl Sensor for DepthSensor {
    fn kind(&self) -> SensorKind {
        SensorKind::Depth
    }

    fn update_rate(&self) -> u32 {
        self.core.update_rate()
    }

    fn ticks(&self) -> u64 {
        self.core.tick()
    }

    fn read(&mut self) -> SensorData {
        self.core.advance();
        self.step_blob();

        let motion_energy = self.blob_vx.abs() + self.blob_vy.abs();
        let mut field = Vec::with_capacity(self.height);
        let mut presence: f64 = 0.0;
        let mut total_depth = 0.0;

        for row in 0..self.height {
            let mut row_data = Vec::with_capacity(self.width);
            for col in 0..self.width {
                let dx = (col as f64 - self.blob_x) / BLOB_RADIUS_X;
                let dy = (row as f64 - self.blob_y) / BLOB_RADIUS_Y;
                let dist_sq = dx * dx + dy * dy;

                let depth = if dist_sq < 1.0 {
                    // Inside the blob: closer to the camera
                    presence = presence.max(1.0 - dist_sq);
                    0.2 + 0.3 * dist_sq
                } else {
                    0.85 + 0.1 * (row as f64 * 0.3 + col as f64 * 0.2).sin()
                };
                let depth = self.core.add_noise(depth);

                row_data.push(round_to(depth, 4));
                total_depth += depth;
            }
            field.push(row_data);
        }

        let cell_count = (self.width * self.height) as f64;
        let avg_depth = total_depth / cell_count;

        SensorData::new(SensorKind::Depth.name())
            .with_value("field", field)
            .with_value("width", self.width)
            .with_value("height", self.height)
            .with_value("avg_depth", round_to(avg_depth, 4))
            .with_value("presence", round_to(presence.min(1.0), 4))
            .with_value("motion_energy", round_to((motion_energy / 4.0).min(1.0), 4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorValue;

    #[test]
    fn test_depth_reading_shape() {
        let mut sensor = DepthSensor::new(12, 8, 0.05, 30, Some(42));
        let reading = sensor.read();

        assert_eq!(reading.sensor_type, "depth");
        assert_eq!(reading.scalar("width"), Some(12.0));
        assert_eq!(reading.scalar("height"), Some(8.0));

        let Some(SensorValue::Grid(field)) = reading.get("field") else {
            panic!("depth field missing");
        };
        assert_eq!(field.len(), 8);
        assert!(field.iter().all(|row| row.len() == 12));
        assert!(field.iter().flatten().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_depth_metrics_in_range() {
        let mut sensor = DepthSensor::from_params(&SensorParams {
            seed: Some(3),
            ..Default::default()
        });

        for _ in 0..30 {
            let reading = sensor.read();
            for key in ["avg_depth", "presence", "motion_energy"] {
                let value = reading.scalar(key).unwrap();
                assert!((0.0..=1.0).contains(&value), "{key} out of range: {value}");
            }
        }
        assert_eq!(sensor.ticks(), 30);
    }

    #[test]
    fn test_blob_stays_inside_margin() {
        let mut sensor = DepthSensor::new(20, 16, 0.0, 30, Some(11));
        for _ in 0..500 {
            sensor.read();
            let (x, y) = sensor.blob_position();
            assert!((2.0..=17.0).contains(&x));
            assert!((2.0..=13.0).contains(&y));
        }
    }

    #[test]
    fn test_blob_creates_presence() {
        // The blob starts in the middle of the field, so someone is present
        let mut sensor = DepthSensor::new(40, 20, 0.0, 30, Some(5));
        let reading = sensor.read();
        assert!(reading.scalar("presence").unwrap() > 0.0);
    }

    #[test]
    fn test_seeded_sensors_repeat() {
        let mut a = DepthSensor::new(10, 10, 0.05, 30, Some(99));
        let mut b = DepthSensor::new(10, 10, 0.05, 30, Some(99));
        for _ in 0..5 {
            assert_eq!(a.read().data, b.read().data);
        }
    }

    #[test]
    fn test_tiny_field_does_not_panic() {
        let mut sensor = DepthSensor::new(0, 0, 0.1, 30, Some(1));
        assert_eq!(sensor.width(), 1);
        let reading = sensor.read();
        assert!(reading.scalar("avg_depth").is_some());
    }
}
