//! Sensorsim - Interactive installation simulator

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sensorsim::config;
use sensorsim::engine::InstallationEngine;
use sensorsim::mapping::TransformKind;
use sensorsim::output::OutputCategory;
use sensorsim::render::{create_renderer, RendererKind};
use sensorsim::sensors::SensorKind;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

const DEFAULT_CONFIG_FILE: &str = "installation.yaml";

/// Log to stderr so NDJSON on stdout stays clean; RUST_LOG wins over `--log-level`
fn init_tracing(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Run {
            config: config_path,
            duration,
            tick_rate,
            renderer,
            render,
        } => {
            let duration = Duration::try_from_secs_f64(duration)
                .with_context(|| format!("invalid duration {}", duration))?;
            let cfg = config::load_config(&config_path)?;

            let kind = renderer.unwrap_or(cfg.renderer);
            let renderer = create_renderer(kind, &render.options());
            let mut engine = InstallationEngine::new(cfg, Some(renderer))?;
            if let Some(rate) = tick_rate {
                engine.set_tick_rate(rate)?;
            }

            let running = engine.stop_handle();
            ctrlc::set_handler(move || {
                running.store(false, std::sync::atomic::Ordering::SeqCst);
            })
            .context("failed to install Ctrl-C handler")?;

            let outcome = engine.run(duration);
            engine.finish()?;
            outcome?;

            let stats = engine.stats();
            eprintln!();
            eprintln!("{} finished", engine.name());
            eprintln!("  Frames: {}", stats.frames);
            eprintln!("  Elapsed: {:.2}s", stats.elapsed.as_secs_f64());
            eprintln!("  Average FPS: {:.1}", stats.average_fps);
            eprintln!(
                "  Frame time: {:.2}ms mean, {:.2}ms max",
                stats.mean_frame_time.as_secs_f64() * 1000.0,
                stats.max_frame_time.as_secs_f64() * 1000.0
            );
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Name: {}", cfg.name);
                    println!("  Renderer: {}", cfg.renderer);
                    println!("  Tick rate: {} fps", cfg.tick_rate);
                    println!("  Smooth alpha: {}", cfg.smooth_alpha);
                    println!("  Sensors: {}", cfg.sensors.len());
                    for sensor in &cfg.sensors {
                        println!("    - {}", sensor.kind);
                    }
                    println!("  Mappings: {}", cfg.mappings.len());
                    for m in &cfg.mappings {
                        println!(
                            "    - {} -> {} ({}, {}..{})",
                            m.source, m.target, m.transform, m.min_out, m.max_out
                        );
                    }
                    println!("  Outputs: {}", cfg.outputs.len());
                    for output in &cfg.outputs {
                        println!("    - {}", output.kind);
                    }
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init { preset } => {
            let Some(yaml) = config::preset(&preset) else {
                let names: Vec<&str> = config::PRESETS.iter().map(|(name, _)| *name).collect();
                bail!("unknown preset '{}' (available: {})", preset, names.join(", "));
            };

            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                println!("{} already exists. Not overwriting.", DEFAULT_CONFIG_FILE);
            } else {
                std::fs::write(DEFAULT_CONFIG_FILE, yaml)
                    .with_context(|| format!("failed to write {}", DEFAULT_CONFIG_FILE))?;
                println!("Created {} from the {} preset.", DEFAULT_CONFIG_FILE, preset);
            }
        }

        Commands::List => {
            println!("Sensors:");
            for kind in SensorKind::ALL {
                println!("  {:<8} {}", kind.name(), kind.fields().join(", "));
            }

            println!("\nOutput categories:");
            for category in OutputCategory::ALL {
                println!("  {}", category);
            }

            println!("\nTransforms:");
            for kind in TransformKind::ALL {
                println!("  {}", kind);
            }

            println!("\nRenderers:");
            for kind in RendererKind::ALL {
                println!("  {}", kind);
            }

            println!("\nPresets:");
            for (name, _) in config::PRESETS {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}
