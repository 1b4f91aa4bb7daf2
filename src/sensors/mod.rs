//! Simulated sensors
//!
//! Software-only stand-ins for depth cameras, LIDAR units and motion
//! trackers. Every sensor returns the same [`SensorData`] envelope so the
//! mapping layer never needs to know which device produced a reading.

mod depth;
mod lidar;
mod motion;
mod sensor;

pub use depth::DepthSensor;
pub use lidar::LidarSensor;
pub use motion::MotionSensor;
pub use sensor::{unix_now, Sensor, SensorData, SensorKind, SensorParams, SensorValue};

/// Build a sensor of the given kind
pub fn create_sensor(kind: SensorKind, params: &SensorParams) -> Box<dyn Sensor> {
    match kind {
        SensorKind::Depth => Box::new(DepthSensor::from_params(params)),
        SensorKind::Lidar => Box::new(LidarSensor::from_params(params)),
        SensorKind::Motion => Box::new(MotionSensor::from_params(params)),
    }
}
