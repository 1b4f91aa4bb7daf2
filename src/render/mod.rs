//! Renderers for installation frames
//!
//! - ASCII art in the terminal
//! - NDJSON lines on stdout
//! - OSC-style address/value pairs, buffered for forwarding

mod json_stream;
mod osc;
mod terminal;

pub use json_stream::JsonStreamRenderer;
pub use osc::{OscMessage, OscRenderer, DEFAULT_PREFIX as OSC_PREFIX};
pub use terminal::TerminalRenderer;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::Frame;
use crate::error::ParseError;

/// Anything that can present a frame
pub trait Renderer {
    /// Present one frame
    fn render(&mut self, frame: &Frame) -> Result<()>;

    /// Release any resources held by the renderer (terminal state, buffers)
    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Types of renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    /// Coloured ASCII art (default)
    #[default]
    Terminal,
    /// One JSON object per frame
    JsonStream,
    /// OSC address/value pairs
    Osc,
}

impl RendererKind {
    pub const ALL: [RendererKind; 3] = [RendererKind::Terminal, RendererKind::JsonStream, RendererKind::Osc];

    pub fn name(&self) -> &'static str {
        match self {
            RendererKind::Terminal => "terminal",
            RendererKind::JsonStream => "json_stream",
            RendererKind::Osc => "osc",
        }
    }
}

impl FromStr for RendererKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RendererKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParseError::UnknownRenderer(s.to_string()))
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings for renderers built by [`create_renderer`]
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Terminal field width in characters
    pub width: usize,
    /// Terminal field height in rows
    pub height: usize,
    /// Show the stats line under the terminal field
    pub show_stats: bool,
    /// Pretty-print JSON instead of one line per frame
    pub pretty: bool,
    /// Include the per-category breakdown in JSON records
    pub include_routed: bool,
    /// Root OSC address
    pub osc_prefix: String,
    /// Print every OSC message to stdout
    pub osc_log: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 60,
            height: 20,
            show_stats: true,
            pretty: false,
            include_routed: false,
            osc_prefix: osc::DEFAULT_PREFIX.to_string(),
            osc_log: false,
        }
    }
}

/// Build a renderer writing to stdout
pub fn create_renderer(kind: RendererKind, options: &RenderOptions) -> Box<dyn Renderer> {
    match kind {
        RendererKind::Terminal => Box::new(TerminalRenderer::new(
            std::io::stdout(),
            options.width,
            options.height,
            options.show_stats,
        )),
        RendererKind::JsonStream => Box::new(
            JsonStreamRenderer::new(std::io::stdout())
                .with_pretty(options.pretty)
                .with_routed(options.include_routed),
        ),
        RendererKind::Osc => Box::new(
            OscRenderer::new(std::io::stdout(), &options.osc_prefix, osc::DEFAULT_BUFFER_SIZE)
                .with_log(options.osc_log),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_kind_names() {
        for kind in RendererKind::ALL {
            assert_eq!(kind.name().parse::<RendererKind>(), Ok(kind));
        }
        assert!("opengl".parse::<RendererKind>().is_err());

        let kind: RendererKind = serde_yaml::from_str("json_stream").unwrap();
        assert_eq!(kind, RendererKind::JsonStream);
    }

    #[test]
    fn test_default_renderer_is_terminal() {
        assert_eq!(RendererKind::default(), RendererKind::Terminal);
    }
}
