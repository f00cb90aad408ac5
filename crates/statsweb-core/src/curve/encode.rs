//! GIF89a serialization of an [`Animation`].
//!
//! One global two-entry palette (white, black), a NETSCAPE loop extension,
//! and one image block per frame carrying its delay.

use std::borrow::Cow;
use std::io::Write;

use crate::curve::Animation;
use crate::error::{Result, StatsWebError};

/// Global palette: index 0 white, index 1 black.
pub const PALETTE: [u8; 6] = [0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00];

/// Encode `anim` to `out`. The writer is flushed before returning.
pub fn encode_gif<W: Write>(anim: &Animation, out: W) -> Result<()> {
    let first = anim
        .frames()
        .first()
        .ok_or_else(|| StatsWebError::Encode("animation has no frames".into()))?;

    let mut enc = gif::Encoder::new(out, first.width(), first.height(), &PALETTE)?;
    let repeat = match anim.loop_count() {
        0 => gif::Repeat::Infinite,
        n => gif::Repeat::Finite(n),
    };
    enc.set_repeat(repeat)?;

    for (frame, &delay) in anim.frames().iter().zip(anim.delays()) {
        let f = gif::Frame {
            width: frame.width(),
            height: frame.height(),
            delay,
            buffer: Cow::Borrowed(frame.pixels()),
            ..gif::Frame::default()
        };
        enc.write_frame(&f)?;
    }

    let mut out = enc
        .into_inner()
        .map_err(|e| StatsWebError::Encode(format!("write trailer: {e}")))?;
    out.flush()
        .map_err(|e| StatsWebError::Encode(format!("flush: {e}")))?;
    Ok(())
}
