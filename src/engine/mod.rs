//! Installation engine
//!
//! Drives the sense -> map -> route -> render cycle at a fixed tick rate.

mod frame;

pub use frame::Frame;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::config::InstallationConfig;
use crate::mapping::{MappingEngine, ParamMap};
use crate::output::OutputRouter;
use crate::render::Renderer;
use crate::sensors::{unix_now, Sensor};

/// Callback invoked with every frame after it is rendered
pub type FrameCallback = Box<dyn FnMut(&Frame)>;

/// Timing summary of the frames produced so far
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    pub frames: u64,
    pub elapsed: Duration,
    pub average_fps: f64,
    /// Mean time spent inside a tick, render included
    pub mean_frame_time: Duration,
    pub max_frame_time: Duration,
}

/// Runs an installation: sensors, mapping, routing and an optional renderer
pub struct InstallationEngine {
    name: String,
    sensors: Vec<Box<dyn Sensor>>,
    mapper: MappingEngine,
    router: OutputRouter,
    renderer: Option<Box<dyn Renderer>>,
    callbacks: Vec<FrameCallback>,

    tick_rate: u32,
    running: Arc<AtomicBool>,

    frame_count: u64,
    elapsed: Duration,
    timed_frames: u32,
    frame_time_total: Duration,
    frame_time_max: Duration,
}

impl InstallationEngine {
    /// Validate the configuration and build every component from it
    ///
    /// Without a renderer the engine runs headless.
    pub fn new(config: InstallationConfig, renderer: Option<Box<dyn Renderer>>) -> Result<Self> {
        config.validate()?;
        let tick_rate = u32::try_from(config.tick_rate).context("tick_rate out of range")?;

        let engine = Self {
            sensors: config.build_sensors(),
            mapper: config.mapping_engine(),
            router: OutputRouter::new(config.build_targets()),
            renderer,
            callbacks: Vec::new(),
            tick_rate,
            running: Arc::new(AtomicBool::new(true)),
            frame_count: 0,
            elapsed: Duration::ZERO,
            timed_frames: 0,
            frame_time_total: Duration::ZERO,
            frame_time_max: Duration::ZERO,
            name: config.name,
        };

        debug!(
            sensors = engine.sensors.len(),
            rules = engine.mapper.rules().len(),
            outputs = engine.router.targets().len(),
            "engine built"
        );
        Ok(engine)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sensors(&self) -> &[Box<dyn Sensor>] {
        &self.sensors
    }

    pub fn router(&self) -> &OutputRouter {
        &self.router
    }

    pub fn mapper(&self) -> &MappingEngine {
        &self.mapper
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    /// Change the tick rate used by subsequent runs
    pub fn set_tick_rate(&mut self, tick_rate: u32) -> Result<()> {
        if tick_rate < 1 {
            bail!("tick_rate must be >= 1, got {}", tick_rate);
        }
        self.tick_rate = tick_rate;
        Ok(())
    }

    /// Register a callback invoked after every rendered frame
    pub fn on_frame(&mut self, callback: impl FnMut(&Frame) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Shared flag; clearing it makes [`run`](Self::run) return after the current tick
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Wall time spent inside [`run`](Self::run) so far
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn average_fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.frame_count as f64 / secs
    }

    pub fn stats(&self) -> RunStats {
        let mean_frame_time = if self.timed_frames == 0 {
            Duration::ZERO
        } else {
            self.frame_time_total / self.timed_frames
        };
        RunStats {
            frames: self.frame_count,
            elapsed: self.elapsed,
            average_fps: self.average_fps(),
            mean_frame_time,
            max_frame_time: self.frame_time_max,
        }
    }

    /// Run one tick, render it and notify callbacks
    pub fn step(&mut self) -> Result<Frame> {
        let frame = self.tick();
        self.frame_count += 1;

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&frame)?;
        }
        for callback in &mut self.callbacks {
            callback(&frame);
        }
        Ok(frame)
    }

    /// Tick at the configured rate until `duration` has passed or the
    /// engine is stopped
    pub fn run(&mut self, duration: Duration) -> Result<()> {
        let interval = Duration::from_secs_f64(1.0 / f64::from(self.tick_rate.max(1)));
        info!(
            name = %self.name,
            tick_rate = self.tick_rate,
            duration_secs = duration.as_secs_f64(),
            "installation started"
        );

        let start = Instant::now();
        let mut next_tick = start;
        let mut result = Ok(());

        while self.is_running() {
            let now = Instant::now();
            if now.duration_since(start) >= duration {
                break;
            }
            if next_tick > now {
                thread::sleep(next_tick - now);
            }

            let frame_start = Instant::now();
            if let Err(e) = self.step() {
                result = Err(e);
                break;
            }
            self.record_frame_time(frame_start.elapsed());

            next_tick += interval;
            // Behind schedule: resume from now instead of bursting
            let now = Instant::now();
            if next_tick < now {
                next_tick = now;
            }
        }

        self.elapsed += start.elapsed();
        info!(
            frames = self.frame_count,
            fps = self.average_fps(),
            "installation stopped"
        );
        result
    }

    /// Tear down the renderer
    pub fn finish(&mut self) -> Result<()> {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.cleanup()?;
        }
        Ok(())
    }

    /// Read every sensor in order, map, merge and route
    fn tick(&mut self) -> Frame {
        let mut params = ParamMap::new();
        for sensor in &mut self.sensors {
            let reading = sensor.read();
            params.extend(self.mapper.apply(&reading));
        }

        let routed = self.router.route(&params);
        debug!(frame = self.frame_count, params = params.len(), "tick");

        Frame {
            frame: self.frame_count,
            timestamp: unix_now(),
            params,
            routed,
        }
    }

    fn record_frame_time(&mut self, frame_time: Duration) {
        self.timed_frames = self.timed_frames.saturating_add(1);
        self.frame_time_total += frame_time;
        self.frame_time_max = self.frame_time_max.max(frame_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MappingConfig, OutputConfig, SensorConfig};
    use crate::mapping::TransformKind;
    use crate::output::OutputCategory;
    use crate::sensors::SensorKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn quiet_sensor(kind: SensorKind, seed: u64) -> SensorConfig {
        let mut sensor = SensorConfig::new(kind);
        sensor.params.noise = Some(0.0);
        sensor.params.seed = Some(seed);
        sensor
    }

    fn minimal_config() -> InstallationConfig {
        InstallationConfig {
            name: "Test Installation".to_string(),
            sensors: vec![quiet_sensor(SensorKind::Motion, 7)],
            mappings: vec![MappingConfig::new(
                "motion.magnitude",
                "visual.brightness",
                TransformKind::Linear,
                0.0,
                1.0,
            )],
            outputs: vec![OutputConfig { kind: OutputCategory::Visual }],
            ..Default::default()
        }
    }

    /// Renderer that records every frame and whether it was cleaned up
    #[derive(Default, Clone)]
    struct Recorder {
        frames: Rc<RefCell<Vec<Frame>>>,
        cleaned_up: Rc<RefCell<bool>>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, frame: &Frame) -> Result<()> {
            self.frames.borrow_mut().push(frame.clone());
            Ok(())
        }

        fn cleanup(&mut self) -> Result<()> {
            *self.cleaned_up.borrow_mut() = true;
            Ok(())
        }
    }

    struct Failing;

    impl Renderer for Failing {
        fn render(&mut self, _frame: &Frame) -> Result<()> {
            bail!("display unplugged")
        }
    }

    #[test]
    fn test_initializes_from_config() {
        let engine = InstallationEngine::new(minimal_config(), None).unwrap();
        assert_eq!(engine.sensors().len(), 1);
        assert_eq!(engine.router().targets().len(), 1);
        assert_eq!(engine.tick_rate(), 30);
        assert_eq!(engine.name(), "Test Installation");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = InstallationConfig {
            name: "Bad".to_string(),
            ..Default::default()
        };
        let err = InstallationEngine::new(config, None).err().unwrap();
        assert!(err.to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn test_rejects_negative_tick_rate() {
        let mut config = minimal_config();
        config.tick_rate = -10;
        let err = InstallationEngine::new(config, None).err().unwrap();
        assert!(err.to_string().contains("tick_rate must be >= 1, got -10"));
    }

    #[test]
    fn test_step_returns_frame() {
        let mut engine = InstallationEngine::new(minimal_config(), None).unwrap();
        let frame = engine.step().unwrap();

        assert_eq!(frame.frame, 0);
        assert!(frame.timestamp > 0.0);
        assert!(frame.params.contains_key("visual.brightness"));
        let visual = &frame.routed[&OutputCategory::Visual];
        assert_eq!(visual["brightness"], frame.params["visual.brightness"]);
    }

    #[test]
    fn test_frame_count_increments() {
        let mut engine = InstallationEngine::new(minimal_config(), None).unwrap();
        assert_eq!(engine.frame_count(), 0);
        engine.step().unwrap();
        assert_eq!(engine.frame_count(), 1);
        let frame = engine.step().unwrap();
        assert_eq!(engine.frame_count(), 2);
        assert_eq!(frame.frame, 1);
    }

    #[test]
    fn test_frame_callback() {
        let mut engine = InstallationEngine::new(minimal_config(), None).unwrap();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        engine.on_frame(move |frame| sink.borrow_mut().push(frame.frame));

        engine.step().unwrap();
        engine.step().unwrap();
        assert_eq!(*received.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_later_sensor_wins_on_shared_target() {
        let mut config = minimal_config();
        config.sensors = vec![
            quiet_sensor(SensorKind::Depth, 1),
            quiet_sensor(SensorKind::Motion, 2),
        ];
        config.mappings = vec![
            MappingConfig::new("depth.avg_depth", "visual.level", TransformKind::Linear, 0.0, 1.0),
            MappingConfig::new("motion.magnitude", "visual.level", TransformKind::Linear, 100.0, 200.0),
        ];

        let mut engine = InstallationEngine::new(config, None).unwrap();
        let frame = engine.step().unwrap();
        assert!(frame.params["visual.level"] >= 100.0);
    }

    #[test]
    fn test_unregistered_category_is_not_routed() {
        let mut config = minimal_config();
        config.mappings.push(MappingConfig::new(
            "motion.dx",
            "audio.pan",
            TransformKind::Linear,
            0.0,
            1.0,
        ));

        let mut engine = InstallationEngine::new(config, None).unwrap();
        let frame = engine.step().unwrap();
        assert!(frame.params.contains_key("audio.pan"));
        assert!(!frame.routed.contains_key(&OutputCategory::Audio));
    }

    #[test]
    fn test_run_renders_frames() {
        let recorder = Recorder::default();
        let mut engine =
            InstallationEngine::new(minimal_config(), Some(Box::new(recorder.clone()))).unwrap();
        engine.set_tick_rate(10).unwrap();
        engine.run(Duration::from_millis(200)).unwrap();

        assert!(engine.frame_count() >= 1);
        assert_eq!(recorder.frames.borrow().len() as u64, engine.frame_count());
        assert!(engine.average_fps() > 0.0);
        assert!(engine.elapsed() >= Duration::from_millis(200));
    }

    #[test]
    fn test_headless_run_and_stats() {
        let mut engine = InstallationEngine::new(minimal_config(), None).unwrap();
        engine.set_tick_rate(20).unwrap();
        engine.run(Duration::from_millis(100)).unwrap();

        let stats = engine.stats();
        assert_eq!(stats.frames, engine.frame_count());
        assert!(stats.frames >= 1);
        assert!(stats.max_frame_time >= stats.mean_frame_time);
    }

    #[test]
    fn test_stop_handle_ends_run() {
        let mut engine = InstallationEngine::new(minimal_config(), None).unwrap();
        engine.stop_handle().store(false, Ordering::SeqCst);
        engine.run(Duration::from_secs(5)).unwrap();

        assert_eq!(engine.frame_count(), 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_callback_can_stop_run() {
        let mut engine = InstallationEngine::new(minimal_config(), None).unwrap();
        engine.set_tick_rate(100).unwrap();
        let handle = engine.stop_handle();
        engine.on_frame(move |frame| {
            if frame.frame == 2 {
                handle.store(false, Ordering::SeqCst);
            }
        });

        engine.run(Duration::from_secs(5)).unwrap();
        assert_eq!(engine.frame_count(), 3);
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let mut engine = InstallationEngine::new(minimal_config(), None).unwrap();
        assert!(engine.set_tick_rate(0).is_err());
        assert_eq!(engine.tick_rate(), 30);
    }

    #[test]
    fn test_render_error_propagates() {
        let mut engine = InstallationEngine::new(minimal_config(), Some(Box::new(Failing))).unwrap();
        let err = engine.run(Duration::from_secs(1)).unwrap_err();
        assert!(err.to_string().contains("display unplugged"));
        assert_eq!(engine.frame_count(), 1);
    }

    #[test]
    fn test_finish_cleans_up_renderer() {
        let recorder = Recorder::default();
        let mut engine =
            InstallationEngine::new(minimal_config(), Some(Box::new(recorder.clone()))).unwrap();
        engine.step().unwrap();
        engine.finish().unwrap();
        assert!(*recorder.cleaned_up.borrow());
    }
}
