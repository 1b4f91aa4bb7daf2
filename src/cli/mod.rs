//! CLI interface for Sensorsim

use clap::{Args, Parser, Subcommand};
use sensorsim::render::{RenderOptions, RendererKind, OSC_PREFIX};
use std::path::PathBuf;

/// Interactive installation simulator
#[derive(Parser)]
#[command(name = "sensorsim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an installation
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "installation.yaml")]
        config: PathBuf,

        /// Duration in seconds
        #[arg(short, long, default_value = "10")]
        duration: f64,

        /// Override the configured tick rate
        #[arg(short, long)]
        tick_rate: Option<u32>,

        /// Override the configured renderer
        #[arg(short, long, value_parser = parse_renderer)]
        renderer: Option<RendererKind>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "installation.yaml")]
        config: PathBuf,
    },

    /// Write a bundled preset to installation.yaml
    Init {
        /// Preset name
        #[arg(short, long, default_value = "depth_field")]
        preset: String,
    },

    /// List sensors, outputs, transforms and renderers
    List,
}

/// Renderer settings for `run`
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Terminal field width in characters
    #[arg(long, default_value = "60")]
    pub width: usize,

    /// Terminal field height in rows
    #[arg(long, default_value = "20")]
    pub height: usize,

    /// Hide the stats line under the terminal field
    #[arg(long)]
    pub no_stats: bool,

    /// Pretty-print JSON records
    #[arg(long)]
    pub pretty: bool,

    /// Add the per-category breakdown to JSON records
    #[arg(long)]
    pub include_routed: bool,

    /// Root OSC address
    #[arg(long, default_value = OSC_PREFIX)]
    pub osc_prefix: String,

    /// Buffer OSC messages without printing them
    #[arg(long)]
    pub osc_quiet: bool,
}

impl RenderArgs {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            show_stats: !self.no_stats,
            pretty: self.pretty,
            include_routed: self.include_routed,
            osc_prefix: self.osc_prefix.clone(),
            osc_log: !self.osc_quiet,
        }
    }
}

fn parse_renderer(s: &str) -> Result<RendererKind, String> {
    s.parse().map_err(|e: sensorsim::ParseError| e.to_string())
}
