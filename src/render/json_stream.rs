//! JSON streaming renderer
//!
//! Emits one compact JSON object per frame (NDJSON), for piping into
//! external visualisation tools, loggers or dashboards:
//!
//! ```text
//! {"frame":0,"timestamp":1707600000.123,"params":{"visual.brightness":0.72}}
//! {"frame":1,"timestamp":1707600000.156,"params":{"visual.brightness":0.74}}
//! ```

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use super::Renderer;
use crate::engine::Frame;
use crate::mapping::ParamMap;
use crate::output::Routed;

#[derive(Serialize)]
struct Record<'a> {
    frame: u64,
    timestamp: f64,
    params: &'a ParamMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    routed: Option<&'a Routed>,
}

/// Writes one JSON record per frame
pub struct JsonStreamRenderer<W: Write> {
    out: W,
    pretty: bool,
    include_routed: bool,
    lines_written: u64,
}

impl<W: Write> JsonStreamRenderer<W> {
    /// Compact records without the routed breakdown
    pub fn new(out: W) -> Self {
        Self {
            out,
            pretty: false,
            include_routed: false,
            lines_written: 0,
        }
    }

    /// Pretty-print each record instead of one line per frame
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Include the `routed` breakdown next to the flat params
    pub fn with_routed(mut self, include_routed: bool) -> Self {
        self.include_routed = include_routed;
        self
    }

    /// Number of records written
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonStreamRenderer<W> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        let record = Record {
            frame: frame.frame,
            timestamp: frame.timestamp,
            params: &frame.params,
            routed: self.include_routed.then_some(&frame.routed),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, &record)
        } else {
            serde_json::to_writer(&mut self.out, &record)
        }
        .context("failed to encode frame")?;

        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.lines_written += 1;
        Ok(())
    }
}
