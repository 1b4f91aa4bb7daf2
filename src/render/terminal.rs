//! Terminal renderer
//!
//! Draws frames as coloured ASCII art. The field switches between a
//! motion trace (when `visual.trace_x` is routed) and a radial depth
//! pattern (when brightness or particle density is routed). Audio and
//! spatial parameters get a one-line gauge each.

use std::io::Write;

use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use super::Renderer;
use crate::engine::Frame;
use crate::mapping::ParamMap;
use crate::output::OutputCategory;

/// Brightness ramp, darkest first
const BRIGHTNESS_CHARS: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const SPATIAL_SLOTS: usize = 21;
const AUDIO_BAR_WIDTH: f64 = 30.0;

/// Map a 0-1 value onto the brightness ramp
pub fn brightness_char(value: f64) -> char {
    let index = (value.clamp(0.0, 1.0) * (BRIGHTNESS_CHARS.len() - 1) as f64) as usize;
    BRIGHTNESS_CHARS[index]
}

fn channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Dark blue -> cyan -> white gradient
fn brightness_color(value: f64) -> Color {
    let v = value.clamp(0.0, 1.0);
    Color::Rgb {
        r: channel(v * 255.0),
        g: channel(v * 255.0),
        b: channel(80.0 + v * 175.0),
    }
}

fn trace_color(value: f64) -> Color {
    Color::Rgb {
        r: channel(value * 255.0),
        g: channel(value * 180.0),
        b: channel(80.0 + value * 175.0),
    }
}

/// What the field area shows this frame
#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldMode {
    Trace { x: f64, y: f64, brightness: f64 },
    Depth { brightness: f64, density: f64 },
    Blank,
}

impl FieldMode {
    fn from_visual(visual: Option<&ParamMap>) -> Self {
        let Some(visual) = visual else {
            return FieldMode::Blank;
        };
        let get = |key: &str, default: f64| visual.get(key).copied().unwrap_or(default);

        if visual.contains_key("trace_x") {
            FieldMode::Trace {
                x: get("trace_x", 0.0),
                y: get("trace_y", 0.0),
                brightness: get("trace_brightness", 0.5),
            }
        } else if visual.contains_key("particle_density") || visual.contains_key("brightness") {
            FieldMode::Depth {
                brightness: get("brightness", 0.5),
                density: get("particle_density", 0.5),
            }
        } else {
            FieldMode::Blank
        }
    }

    /// Value and colour of the cell at normalized (nx, ny)
    fn cell(&self, nx: f64, ny: f64, frame: u64) -> Option<(f64, Color)> {
        match *self {
            FieldMode::Trace { x, y, brightness } => {
                // Trace coordinates arrive in -1..1
                let tx = (x + 1.0) / 2.0;
                let ty = (y + 1.0) / 2.0;
                let dist = ((nx - tx).powi(2) + (ny - ty).powi(2)).sqrt();
                let value = (1.0 - dist * 3.0).max(0.0) * brightness;
                Some((value, trace_color(value)))
            }
            FieldMode::Depth { brightness, density } => {
                let dist = ((nx - 0.5).powi(2) + (ny - 0.5).powi(2)).sqrt();
                let wave = 0.5 + 0.5 * (dist * 20.0 - frame as f64 * 0.3 + density * 10.0).sin();
                let value = wave * brightness * density;
                Some((value, brightness_color(value)))
            }
            FieldMode::Blank => None,
        }
    }
}

/// Renders frames as coloured ASCII art
pub struct TerminalRenderer<W: Write> {
    out: W,
    width: usize,
    height: usize,
    show_stats: bool,
    first_frame: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, width: usize, height: usize, show_stats: bool) -> Self {
        Self {
            out,
            width,
            height,
            show_stats,
            first_frame: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_field(&mut self, mode: FieldMode, frame: u64) -> Result<()> {
        let border = "-".repeat(self.width + 2);
        queue!(self.out, Print(format!("  {border}\n")))?;

        let col_span = self.width.saturating_sub(1).max(1) as f64;
        let row_span = self.height.saturating_sub(1).max(1) as f64;

        for row in 0..self.height {
            queue!(self.out, Print("  |"))?;
            for col in 0..self.width {
                let nx = col as f64 / col_span;
                let ny = row as f64 / row_span;
                match mode.cell(nx, ny, frame) {
                    Some((value, color)) => queue!(
                        self.out,
                        SetForegroundColor(color),
                        Print(brightness_char(value)),
                        ResetColor
                    )?,
                    None => queue!(self.out, Print(' '))?,
                }
            }
            queue!(self.out, Print("|\n"))?;
        }

        queue!(self.out, Print(format!("  {border}\n")))?;
        Ok(())
    }

    fn draw_audio(&mut self, audio: &ParamMap) -> Result<()> {
        let volume = audio.get("volume").copied().unwrap_or(0.0);
        let pitch = audio.get("pitch").copied().unwrap_or(440.0);
        let bar = "|".repeat((volume * AUDIO_BAR_WIDTH).max(0.0) as usize);

        queue!(
            self.out,
            Print(format!("  AUDIO  vol={volume:.2}  pitch={pitch:.0}Hz  ")),
            SetForegroundColor(Color::Rgb { r: 80, g: 255, b: 120 }),
            Print(bar),
            ResetColor,
            Print("\n")
        )?;
        Ok(())
    }

    fn draw_spatial(&mut self, spatial: &ParamMap) -> Result<()> {
        let pan = spatial.get("pan").copied().unwrap_or(0.0);
        let depth = spatial.get("depth").copied().unwrap_or(0.0);

        let position = ((pan + 1.0) / 2.0 * (SPATIAL_SLOTS - 1) as f64).max(0.0) as usize;
        let position = position.min(SPATIAL_SLOTS - 1);
        let indicator: String = (0..SPATIAL_SLOTS)
            .map(|slot| if slot == position { 'O' } else { '.' })
            .collect();

        queue!(
            self.out,
            Print(format!("  SPATIAL  pan={pan:+.2}  depth={depth:.2}  {indicator}\n"))
        )?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        if self.first_frame {
            queue!(self.out, cursor::Hide)?;
            self.first_frame = false;
        }

        queue!(
            self.out,
            Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Rgb { r: 100, g: 200, b: 255 }),
            Print(format!("  INSTALLATION  frame {:05}", frame.frame)),
            ResetColor,
            Print("\n")
        )?;

        let mode = FieldMode::from_visual(frame.routed.get(&OutputCategory::Visual));
        self.draw_field(mode, frame.frame)?;

        if let Some(audio) = frame.routed.get(&OutputCategory::Audio) {
            self.draw_audio(audio)?;
        }
        if let Some(spatial) = frame.routed.get(&OutputCategory::Spatial) {
            self.draw_spatial(spatial)?;
        }

        if self.show_stats {
            queue!(
                self.out,
                SetForegroundColor(Color::Rgb { r: 120, g: 120, b: 120 }),
                Print(format!("  t={:.2}  params={}", frame.timestamp, frame.params.len())),
                ResetColor,
                Print("\n")
            )?;
        }

        self.out.flush()?;
        Ok(())
    }

    /// Restore cursor visibility
    fn cleanup(&mut self) -> Result<()> {
        queue!(self.out, cursor::Show)?;
        self.out.flush()?;
        Ok(())
    }
}
