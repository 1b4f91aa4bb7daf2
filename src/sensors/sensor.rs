//! Sensor trait, reading envelope, and shared simulation state

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// One value inside a sensor reading
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Scalar(f64),
    Flag(bool),
    Text(String),
    Series(Vec<f64>),
    Grid(Vec<Vec<f64>>),
    Points(Vec<[f64; 3]>),
}

impl SensorValue {
    /// Numeric view of the value, if it has one
    ///
    /// Flags read as 1.0 / 0.0 and text is parsed; collections have no
    /// scalar form.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            SensorValue::Scalar(v) => Some(*v),
            SensorValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            SensorValue::Text(s) => s.trim().parse().ok(),
            SensorValue::Series(_) | SensorValue::Grid(_) | SensorValue::Points(_) => None,
        }
    }
}

impl From<f64> for SensorValue {
    fn from(value: f64) -> Self {
        SensorValue::Scalar(value)
    }
}

impl From<usize> for SensorValue {
    fn from(value: usize) -> Self {
        SensorValue::Scalar(value as f64)
    }
}

impl From<bool> for SensorValue {
    fn from(value: bool) -> Self {
        SensorValue::Flag(value)
    }
}

impl From<&str> for SensorValue {
    fn from(value: &str) -> Self {
        SensorValue::Text(value.to_string())
    }
}

impl From<String> for SensorValue {
    fn from(value: String) -> Self {
        SensorValue::Text(value)
    }
}

impl From<Vec<f64>> for SensorValue {
    fn from(value: Vec<f64>) -> Self {
        SensorValue::Series(value)
    }
}

impl From<Vec<Vec<f64>>> for SensorValue {
    fn from(value: Vec<Vec<f64>>) -> Self {
        SensorValue::Grid(value)
    }
}

impl From<Vec<[f64; 3]>> for SensorValue {
    fn from(value: Vec<[f64; 3]>) -> Self {
        SensorValue::Points(value)
    }
}

/// Immutable envelope for one sensor reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorData {
    /// Wall-clock seconds since the Unix epoch
    pub timestamp: f64,

    /// Sensor type tag (`depth`, `lidar`, `motion`)
    pub sensor_type: String,

    /// Named values produced by the sensor
    pub data: BTreeMap<String, SensorValue>,
}

impl SensorData {
    /// Create an empty reading stamped with the current time
    pub fn new(sensor_type: impl Into<String>) -> Self {
        Self {
            timestamp: unix_now(),
            sensor_type: sensor_type.into(),
            data: BTreeMap::new(),
        }
    }

    /// Override the timestamp
    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Add a value
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<SensorValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&SensorValue> {
        self.data.get(key)
    }

    /// Numeric value of a field, `None` when absent or non-numeric
    pub fn scalar(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(SensorValue::as_scalar)
    }
}

/// Types of simulated sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Depth camera producing a 2-D depth field
    Depth,
    /// LIDAR scanner producing a point cloud
    Lidar,
    /// Motion tracker producing a 2-D motion vector
    Motion,
}

impl SensorKind {
    pub const ALL: [SensorKind; 3] = [SensorKind::Depth, SensorKind::Lidar, SensorKind::Motion];

    /// Tag carried by every reading from this kind of sensor
    pub fn name(&self) -> &'static str {
        match self {
            SensorKind::Depth => "depth",
            SensorKind::Lidar => "lidar",
            SensorKind::Motion => "motion",
        }
    }

    /// Fields present in every reading
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            SensorKind::Depth => &["field", "width", "height", "avg_depth", "presence", "motion_energy"],
            SensorKind::Lidar => &[
                "points",
                "num_points",
                "nearest_distance",
                "centroid_x",
                "centroid_z",
                "point_density",
            ],
            SensorKind::Motion => &["dx", "dy", "magnitude"],
        }
    }
}

impl FromStr for SensorKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParseError::UnknownSensor(s.to_string()))
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for simulated sensors
pub trait Sensor: Send {
    /// Kind of this sensor
    fn kind(&self) -> SensorKind;

    /// Nominal readings per second (informational, the caller polls)
    fn update_rate(&self) -> u32;

    /// Number of readings taken so far
    fn ticks(&self) -> u64;

    /// Take one reading
    fn read(&mut self) -> SensorData;
}

/// Optional per-sensor settings; unset values use the sensor's defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorParams {
    /// Standard deviation of Gaussian noise (0 disables noise)
    pub noise: Option<f64>,

    /// Nominal readings per second
    pub update_rate: Option<u32>,

    /// Depth field width in cells
    pub width: Option<usize>,

    /// Depth field height in cells
    pub height: Option<usize>,

    /// Points per LIDAR scan
    pub num_points: Option<usize>,

    /// RNG seed for reproducible runs
    pub seed: Option<u64>,
}

/// State shared by every simulated sensor: tick counter, noise, RNG
pub(crate) struct SensorCore {
    noise: f64,
    update_rate: u32,
    tick: u64,
    rng: StdRng,
}

impl SensorCore {
    pub(crate) fn new(noise: f64, update_rate: u32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            noise: if noise.is_finite() { noise.max(0.0) } else { 0.0 },
            update_rate,
            tick: 0,
            rng,
        }
    }

    pub(crate) fn update_rate(&self) -> u32 {
        self.update_rate
    }

    pub(crate) fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance the tick counter and return the new tick
    pub(crate) fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Zero-mean Gaussian sample
    pub(crate) fn gauss(&mut self, std_dev: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        z * std_dev
    }

    pub(crate) fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.rng.random_range(low..high)
    }

    /// True with probability `p`
    pub(crate) fn chance(&mut self, p: f64) -> bool {
        self.rng.random::<f64>() < p
    }

    /// Add sensor noise, keeping the result in [0, 1]
    pub(crate) fn add_noise(&mut self, value: f64) -> f64 {
        if self.noise <= 0.0 {
            return value;
        }
        (value + self.gauss(self.noise)).clamp(0.0, 1.0)
    }

    /// Add sensor noise without clamping
    pub(crate) fn add_noise_unbounded(&mut self, value: f64) -> f64 {
        if self.noise <= 0.0 {
            return value;
        }
        value + self.gauss(self.noise)
    }
}

/// Round to a fixed number of decimal places
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Seconds since the Unix epoch
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_data_builder() {
        let reading = SensorData::new("depth")
            .at(12.5)
            .with_value("avg_depth", 0.42)
            .with_value("present", true)
            .with_value("label", "near");

        assert_eq!(reading.timestamp, 12.5);
        assert_eq!(reading.sensor_type, "depth");
        assert_eq!(reading.scalar("avg_depth"), Some(0.42));
        assert_eq!(reading.scalar("present"), Some(1.0));
        assert_eq!(reading.scalar("label"), None);
        assert_eq!(reading.scalar("missing"), None);
    }

    #[test]
    fn test_collections_have_no_scalar() {
        assert_eq!(SensorValue::Series(vec![1.0]).as_scalar(), None);
        assert_eq!(SensorValue::Grid(vec![vec![1.0]]).as_scalar(), None);
        assert_eq!(SensorValue::Points(vec![[0.0, 1.0, 2.0]]).as_scalar(), None);
        assert_eq!(SensorValue::Text(" 3.5 ".into()).as_scalar(), Some(3.5));
    }

    #[test]
    fn test_sensor_value_serializes_untagged() {
        let reading = SensorData::new("lidar")
            .at(0.0)
            .with_value("num_points", 2usize)
            .with_value("points", vec![[1.0, 2.0, 3.0]]);
        let json = serde_json::to_string(&reading.data).unwrap();
        assert_eq!(json, r#"{"num_points":2.0,"points":[[1.0,2.0,3.0]]}"#);
    }

    #[test]
    fn test_sensor_kind_parse() {
        assert_eq!("lidar".parse::<SensorKind>(), Ok(SensorKind::Lidar));
        assert_eq!(
            "sonar".parse::<SensorKind>(),
            Err(ParseError::UnknownSensor("sonar".to_string()))
        );
    }

    #[test]
    fn test_core_noise_disabled() {
        let mut core = SensorCore::new(0.0, 30, Some(1));
        assert_eq!(core.add_noise(0.3), 0.3);
        assert_eq!(core.add_noise_unbounded(7.0), 7.0);
    }

    #[test]
    fn test_core_noise_clamped() {
        let mut core = SensorCore::new(5.0, 30, Some(7));
        for _ in 0..100 {
            let v = core.add_noise(0.5);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_core_negative_noise_disabled() {
        let mut core = SensorCore::new(-1.0, 30, Some(7));
        assert_eq!(core.add_noise(0.25), 0.25);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123_456, 4), 0.1235);
        assert_eq!(round_to(2.0, 4), 2.0);
    }
}
