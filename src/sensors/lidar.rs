//! Simulated LIDAR scanner
//!
//! Produces a point cloud of `[x, y, z]` points. A third of the points
//! form a cluster that orbits slowly in front of the scanner; the rest are
//! background scatter.

use std::f64::consts::TAU;

use super::sensor::{round_to, SensorCore};
use super::{Sensor, SensorData, SensorKind, SensorParams};

const DEFAULT_NUM_POINTS: usize = 100;
const DEFAULT_NOISE: f64 = 0.02;
const DEFAULT_UPDATE_RATE: u32 = 15;

/// Orbit step per scan, in radians
const ORBIT_STEP: f64 = 0.05;
const ORBIT_RADIUS: f64 = 3.0;
/// Keeps the orbit in front of the scanner
const ORBIT_Z_OFFSET: f64 = 5.0;

/// LIDAR scanner simulation
pub struct LidarSensor {
    core: SensorCore,
    num_points: usize,
    angle: f64,
}

impl LidarSensor {
    pub fn new(num_points: usize, noise: f64, update_rate: u32, seed: Option<u64>) -> Self {
        Self {
            core: SensorCore::new(noise, update_rate, seed),
            num_points: num_points.max(1),
            angle: 0.0,
        }
    }

    pub fn from_params(params: &SensorParams) -> Self {
        Self::new(
            params.num_points.unwrap_or(DEFAULT_NUM_POINTS),
            params.noise.unwrap_or(DEFAULT_NOISE),
            params.update_rate.unwrap_or(DEFAULT_UPDATE_RATE),
            params.seed,
        )
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    fn scan(&mut self) -> Vec<[f64; 3]> {
        let cluster_cx = ORBIT_RADIUS * self.angle.cos();
        let cluster_cz = ORBIT_RADIUS * self.angle.sin() + ORBIT_Z_OFFSET;
        let cluster_size = self.num_points / 3;

        let mut points = Vec::with_capacity(self.num_points);
        for i in 0..self.num_points {
            let (x, y, z) = if i < cluster_size {
                (
                    cluster_cx + self.core.gauss(0.3),
                    self.core.gauss(0.5),
                    cluster_cz + self.core.gauss(0.3),
                )
            } else {
                let angle = self.core.uniform(0.0, TAU);
                let dist = self.core.uniform(2.0, 10.0);
                (dist * angle.cos(), self.core.uniform(-1.0, 1.0), dist * angle.sin())
            };

            let x = self.core.add_noise_unbounded(x);
            let y = self.core.add_noise_unbounded(y);
            let z = self.core.add_noise_unbounded(z);
            points.push([round_to(x, 4), round_to(y, 4), round_to(z, 4)]);
        }
        points
    }
}

impl Sensor for LidarSensor {
    fn kind(&self) -> SensorKind {
        SensorKind::Lidar
    }

    fn update_rate(&self) -> u32 {
        self.core.update_rate()
    }

    fn ticks(&self) -> u64 {
        self.core.tick()
    }

    fn read(&mut self) -> SensorData {
        self.core.advance();
        self.angle += ORBIT_STEP;

        let points = self.scan();
        let count = points.len() as f64;

        let centroid_x = points.iter().map(|p| p[0]).sum::<f64>() / count;
        let centroid_z = points.iter().map(|p| p[2]).sum::<f64>() / count;
        let distances: Vec<f64> = points
            .iter()
            .map(|p| (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt())
            .collect();
        let nearest = distances.iter().copied().fold(f64::INFINITY, f64::min);

        // How tightly the points sit around their mean distance
        let mean_dist = distances.iter().sum::<f64>() / count;
        let variance = distances.iter().map(|d| (d - mean_dist).powi(2)).sum::<f64>() / count;
        let density = (1.0 - variance.sqrt() / 5.0).clamp(0.0, 1.0);

        SensorData::new(SensorKind::Lidar.name())
            .with_value("num_points", points.len())
            .with_value("points", points)
            .with_value("nearest_distance", round_to(nearest, 4))
            .with_value("centroid_x", round_to(centroid_x, 4))
            .with_value("centroid_z", round_to(centroid_z, 4))
            .with_value("point_density", round_to(density, 4))
    }
}
