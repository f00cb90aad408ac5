//! Lissajous animation: parameters, frame raster, and the per-frame sweep.
//!
//! Each frame plots `(sin t, sin(t*freq + phase))` for `t` in
//! `[0, cycles*2π)` on a `(2*size+1)²` two-color canvas. The frequency ratio
//! is fixed for a whole animation; the phase advances by `phase_step` per
//! frame starting at zero.

pub mod encode;
pub mod generator;

use std::f64::consts::PI;

use rand::Rng;
use serde::Deserialize;

use crate::error::{Result, StatsWebError};

pub use encode::{encode_gif, PALETTE};
pub use generator::{GenerationReport, GeneratorMetricNames, Lissajous};

/// Number of complete x oscillator revolutions.
pub const CYCLES: f64 = 5.0;
/// Angular resolution of the sweep.
pub const RESOLUTION: f64 = 0.001;
/// Canvas covers `[-SIZE..=SIZE]`.
pub const SIZE: u16 = 400;
/// Number of animation frames.
pub const FRAMES: u16 = 64;
/// Delay between frames, in 10ms units.
pub const DELAY: u16 = 8;
/// Upper bound (exclusive) of the random frequency ratio.
pub const FREQ_MAX: f64 = 3.0;
/// Phase advance per frame.
pub const PHASE_STEP: f64 = 0.1;

/// Most sweep steps a single frame may take (`cycles*2π / resolution`).
pub const MAX_SWEEP_STEPS: f64 = 1e8;

/// Palette index of the background (white).
pub const BACKGROUND: u8 = 0;
/// Palette index of the curve (black).
pub const FOREGROUND: u8 = 1;

/// Tunable curve constants. `Default` yields the named constants above.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CurveParams {
    pub cycles: f64,
    pub resolution: f64,
    pub size: u16,
    pub frames: u16,
    pub delay: u16,
    pub freq_max: f64,
    pub phase_step: f64,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            cycles: CYCLES,
            resolution: RESOLUTION,
            size: SIZE,
            frames: FRAMES,
            delay: DELAY,
            freq_max: FREQ_MAX,
            phase_step: PHASE_STEP,
        }
    }
}

impl CurveParams {
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(StatsWebError::BadConfig("curve.size must be > 0".into()));
        }
        if u32::from(self.size) * 2 + 1 > u32::from(u16::MAX) {
            return Err(StatsWebError::BadConfig(format!(
                "curve.size must be at most {}",
                (u16::MAX - 1) / 2
            )));
        }
        if self.frames == 0 {
            return Err(StatsWebError::BadConfig("curve.frames must be > 0".into()));
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(StatsWebError::BadConfig(
                "curve.resolution must be a positive number".into(),
            ));
        }
        for (name, v) in [
            ("cycles", self.cycles),
            ("freq_max", self.freq_max),
            ("phase_step", self.phase_step),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(StatsWebError::BadConfig(format!(
                    "curve.{name} must be a non-negative number"
                )));
            }
        }
        if self.sweep_end() / self.resolution > MAX_SWEEP_STEPS {
            return Err(StatsWebError::BadConfig(format!(
                "curve.cycles / curve.resolution allows at most {MAX_SWEEP_STEPS:e} steps per frame"
            )));
        }
        Ok(())
    }

    /// Canvas side length in pixels (`2*size+1`).
    pub fn side(&self) -> u16 {
        self.size.saturating_mul(2).saturating_add(1)
    }

    /// Upper bound of the sweep parameter `t`.
    pub fn sweep_end(&self) -> f64 {
        self.cycles * 2.0 * PI
    }
}

/// One two-color raster frame, row-major, one palette index per byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

impl Frame {
    /// Square frame filled with the background index.
    pub fn blank(side: u16) -> Self {
        let n = usize::from(side) * usize::from(side);
        Self {
            width: side,
            height: side,
            pixels: vec![BACKGROUND; n],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(&self, col: usize, row: usize) -> Option<usize> {
        if col < usize::from(self.width) && row < usize::from(self.height) {
            Some(row * usize::from(self.width) + col)
        } else {
            None
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<u8> {
        self.offset(col, row).and_then(|i| self.pixels.get(i).copied())
    }

    /// Set a pixel. Returns false (and changes nothing) when out of bounds.
    pub fn set(&mut self, col: usize, row: usize, index: u8) -> bool {
        match self.offset(col, row).and_then(|i| self.pixels.get_mut(i)) {
            Some(px) => {
                *px = index;
                true
            }
            None => false,
        }
    }

    /// `(col, row)` of every foreground pixel, row-major order.
    pub fn foreground(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = usize::from(self.width).max(1);
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, &p)| p == FOREGROUND)
            .map(move |(i, _)| (i % w, i / w))
    }
}

/// Frames plus per-frame delays (centiseconds) and a loop count (0 = forever).
#[derive(Debug, Clone, Default)]
pub struct Animation {
    frames: Vec<Frame>,
    delays: Vec<u16>,
    loop_count: u16,
}

impl Animation {
    pub fn new(loop_count: u16) -> Self {
        Self {
            frames: Vec::new(),
            delays: Vec::new(),
            loop_count,
        }
    }

    /// Append a frame together with its delay; keeps both sequences aligned.
    pub fn push(&mut self, frame: Frame, delay: u16) {
        self.frames.push(frame);
        self.delays.push(delay);
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn delays(&self) -> &[u16] {
        &self.delays
    }

    pub fn loop_count(&self) -> u16 {
        self.loop_count
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Map a point of the unit square to canvas coordinates.
///
/// Rounds by adding 0.5 and truncating toward zero, so for `x, y ∈ [-1, 1]`
/// the result is always within `[0, 2*size]`.
pub fn plot(x: f64, y: f64, size: u16) -> (usize, usize) {
    let s = f64::from(size);
    let col = i64::from(size) + (x * s + 0.5) as i64;
    let row = i64::from(size) + (y * s + 0.5) as i64;
    (col.max(0) as usize, row.max(0) as usize)
}

/// Phase of frame `index`: `index` additions of `phase_step` to 0.0.
pub fn phase_for(params: &CurveParams, index: u16) -> f64 {
    let mut phase = 0.0;
    for _ in 0..index {
        phase += params.phase_step;
    }
    phase
}

/// Draw the frequency ratio uniformly from `[0, max)`.
pub fn sample_frequency<R: Rng + ?Sized>(rng: &mut R, max: f64) -> f64 {
    rng.random::<f64>() * max
}

/// Render one frame of the curve family for a fixed `freq` and `phase`.
pub fn render_frame(params: &CurveParams, freq: f64, phase: f64) -> Frame {
    let mut img = Frame::blank(params.side());
    let end = params.sweep_end();
    let mut t = 0.0;
    while t < end {
        let x = t.sin();
        let y = (t * freq + phase).sin();
        let (col, row) = plot(x, y, params.size);
        img.set(col, row, FOREGROUND);
        t += params.resolution;
    }
    img
}

/// Build the whole animation for one frequency ratio.
pub fn build_animation(params: &CurveParams, freq: f64) -> Animation {
    let mut anim = Animation::new(params.frames);
    let mut phase = 0.0;
    for _ in 0..params.frames {
        anim.push(render_frame(params, freq, phase), params.delay);
        phase += params.phase_step;
    }
    anim
}
