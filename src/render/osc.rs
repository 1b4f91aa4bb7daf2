//! OSC (Open Sound Control) renderer
//!
//! Formats parameters as OSC address/value pairs for Max/MSP,
//! TouchDesigner or SuperCollider. Nothing is sent over the network; the
//! messages sit in a bounded buffer that external code can drain, and
//! with logging on each one is also written as a line:
//!
//! ```text
//! OSC  /installation/visual/brightness  0.720000
//! OSC  /installation/audio/volume  0.450000
//! ```

use std::collections::VecDeque;
use std::io::Write;

use anyhow::{Context, Result};

use super::Renderer;
use crate::engine::Frame;

pub const DEFAULT_PREFIX: &str = "/installation";
pub const DEFAULT_BUFFER_SIZE: usize = 1000;

/// One OSC message
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub address: String,
    pub value: f64,
}

/// Buffers frame parameters as OSC messages
pub struct OscRenderer<W: Write> {
    out: W,
    address_prefix: String,
    buffer_size: usize,
    log: bool,
    buffer: VecDeque<OscMessage>,
    messages_total: u64,
}

impl<W: Write> OscRenderer<W> {
    /// Create a renderer; trailing `/` on the prefix is dropped
    pub fn new(out: W, address_prefix: &str, buffer_size: usize) -> Self {
        Self {
            out,
            address_prefix: address_prefix.trim_end_matches('/').to_string(),
            buffer_size,
            log: false,
            buffer: VecDeque::with_capacity(buffer_size.min(DEFAULT_BUFFER_SIZE)),
            messages_total: 0,
        }
    }

    /// Write every message to the output as it is buffered
    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    pub fn address_prefix(&self) -> &str {
        &self.address_prefix
    }

    /// Messages produced since creation, including evicted ones
    pub fn messages_total(&self) -> u64 {
        self.messages_total
    }

    /// Messages currently buffered, oldest first
    pub fn buffer(&self) -> Vec<OscMessage> {
        self.buffer.iter().cloned().collect()
    }

    /// The last `n` buffered messages, oldest first
    pub fn last_messages(&self, n: usize) -> Vec<OscMessage> {
        let skip = self.buffer.len().saturating_sub(n);
        self.buffer.iter().skip(skip).cloned().collect()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Format one frame as a bundle without touching the buffer
    pub fn format_bundle(&self, frame: &Frame) -> Vec<OscMessage> {
        frame
            .params
            .iter()
            .map(|(key, &value)| OscMessage {
                address: self.address_for(key),
                value,
            })
            .collect()
    }

    /// `visual.brightness` -> `/installation/visual/brightness`
    fn address_for(&self, key: &str) -> String {
        format!("{}/{}", self.address_prefix, key.replace('.', "/"))
    }

    fn push(&mut self, message: OscMessage) {
        self.buffer.push_back(message);
        self.messages_total += 1;
        while self.buffer.len() > self.buffer_size {
            self.buffer.pop_front();
        }
    }
}

impl<W: Write> Renderer for OscRenderer<W> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        let bundle = self.format_bundle(frame);
        tracing::trace!(frame = frame.frame, messages = bundle.len(), "osc bundle");

        for message in bundle {
            if self.log {
                writeln!(self.out, "OSC  {}  {:.6}", message.address, message.value)
                    .context("failed to write OSC message")?;
            }
            self.push(message);
        }
        if self.log {
            self.out.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::ParamMap;

    fn renderer() -> OscRenderer<Vec<u8>> {
        OscRenderer::new(Vec::new(), DEFAULT_PREFIX, DEFAULT_BUFFER_SIZE)
    }

    fn frame_with(params: &[(&str, f64)]) -> Frame {
        Frame {
            params: params.iter().map(|(k, v)| (k.to_string(), *v)).collect::<ParamMap>(),
            ..Default::default()
        }
    }

    #[test]
    fn test_address_format() {
        let mut renderer = renderer();
        renderer.render(&frame_with(&[("visual.brightness", 0.72)])).unwrap();

        assert_eq!(
            renderer.buffer(),
            vec![OscMessage {
                address: "/installation/visual/brightness".to_string(),
                value: 0.72,
            }]
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let renderer = OscRenderer::new(Vec::new(), "/stage/", 10);
        assert_eq!(renderer.address_prefix(), "/stage");

        let bundle = renderer.format_bundle(&frame_with(&[("audio.volume", 0.45)]));
        assert_eq!(bundle[0].address, "/stage/audio/volume");
        // format_bundle leaves the buffer alone
        assert!(renderer.buffer().is_empty());
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let mut renderer = OscRenderer::new(Vec::new(), DEFAULT_PREFIX, 3);
        for i in 0..5 {
            renderer.render(&frame_with(&[("audio.volume", i as f64)])).unwrap();
        }

        assert_eq!(renderer.messages_total(), 5);
        let values: Vec<f64> = renderer.buffer().iter().map(|m| m.value).collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_last_messages_and_clear() {
        let mut renderer = renderer();
        renderer
            .render(&frame_with(&[("audio.pitch", 440.0), ("audio.volume", 0.5), ("spatial.pan", -0.2)]))
            .unwrap();

        let last = renderer.last_messages(2);
        assert_eq!(last.len(), 2);
        assert_eq!(last[1].address, "/installation/spatial/pan");
        assert_eq!(renderer.last_messages(10).len(), 3);

        renderer.clear_buffer();
        assert!(renderer.buffer().is_empty());
        assert_eq!(renderer.messages_total(), 3);
    }

    #[test]
    fn test_logged_messages_written_to_output() {
        let mut renderer = renderer().with_log(true);
        renderer
            .render(&frame_with(&[("audio.volume", 0.45), ("visual.brightness", 0.72)]))
            .unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            output,
            "OSC  /installation/audio/volume  0.450000\n\
             OSC  /installation/visual/brightness  0.720000\n"
        );
    }

    #[test]
    fn test_silent_without_log() {
        let mut renderer = renderer();
        renderer.render(&frame_with(&[("visual.brightness", 0.72)])).unwrap();

        assert_eq!(renderer.buffer().len(), 1);
        assert!(renderer.into_inner().is_empty());
    }
}
