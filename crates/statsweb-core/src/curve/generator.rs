//! The generate-and-encode operation with its metrics side effects.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::curve::{build_animation, encode_gif, sample_frequency, CurveParams};
use crate::error::Result;
use crate::metrics::MetricsSink;

/// Metric names the generator reports under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorMetricNames {
    /// Timing sample, seconds for build + encode.
    pub duration: String,
    /// Counter, +1 per generation.
    pub count: String,
}

impl Default for GeneratorMetricNames {
    fn default() -> Self {
        Self {
            duration: "lissajous.load.time".into(),
            count: "lissajous.pageview.count".into(),
        }
    }
}

/// Outcome of one successful generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationReport {
    pub frequency: f64,
    pub frames: usize,
    pub bytes_written: u64,
    pub elapsed: Duration,
}

/// Animated Lissajous generator bound to a metrics sink.
///
/// Holds no mutable state; one instance is shared by all requests.
#[derive(Clone)]
pub struct Lissajous {
    params: CurveParams,
    metrics: Arc<dyn MetricsSink>,
    names: GeneratorMetricNames,
}

impl Lissajous {
    pub fn new(
        params: CurveParams,
        metrics: Arc<dyn MetricsSink>,
        names: GeneratorMetricNames,
    ) -> Self {
        Self {
            params,
            metrics,
            names,
        }
    }

    /// Draw a frequency ratio from `rng`, then generate.
    pub fn generate<R, W>(&self, rng: &mut R, out: W) -> Result<GenerationReport>
    where
        R: Rng + ?Sized,
        W: Write,
    {
        let freq = sample_frequency(rng, self.params.freq_max);
        self.generate_with_frequency(freq, out)
    }

    /// Build the animation for `freq` and encode it to `out`.
    ///
    /// The timing and count metrics are emitted once each, whether or not
    /// encoding succeeds.
    pub fn generate_with_frequency<W: Write>(&self, freq: f64, out: W) -> Result<GenerationReport> {
        let start = Instant::now();

        let anim = build_animation(&self.params, freq);
        let mut counting = CountingWriter { inner: out, written: 0 };
        let res = encode_gif(&anim, &mut counting);

        let elapsed = start.elapsed();
        self.metrics
            .record_timing(&self.names.duration, elapsed.as_secs_f64());
        self.metrics.increment_counter(&self.names.count, 1);

        res?;
        tracing::debug!(
            freq,
            frames = anim.len(),
            bytes = counting.written,
            elapsed_ms = elapsed.as_millis() as u64,
            "lissajous generated"
        );

        Ok(GenerationReport {
            frequency: freq,
            frames: anim.len(),
            bytes_written: counting.written,
            elapsed,
        })
    }
}

struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
