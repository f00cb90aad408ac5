//! Encode -> decode checks against the `gif` decoder.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io::Cursor;

use statsweb_core::curve::{build_animation, encode_gif, Animation, CurveParams, PALETTE};

/// Loop count from the NETSCAPE2.0 application extension, if present.
fn netscape_loops(bytes: &[u8]) -> Option<u16> {
    let tag = b"NETSCAPE2.0";
    let pos = bytes.windows(tag.len()).position(|w| w == tag)?;
    let sub = &bytes[pos + tag.len()..];
    // sub-block: len=3, id=1, lo, hi
    if sub.len() >= 4 && sub[0] == 3 && sub[1] == 1 {
        Some(u16::from_le_bytes([sub[2], sub[3]]))
    } else {
        None
    }
}

struct Decoded {
    width: u16,
    height: u16,
    palette: Vec<u8>,
    frames: Vec<(u16, Vec<u8>)>,
}

fn decode(bytes: &[u8]) -> Decoded {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let mut dec = opts.read_info(Cursor::new(bytes)).unwrap();
    let width = dec.width();
    let height = dec.height();
    let palette = dec.global_palette().unwrap().to_vec();
    let mut frames = Vec::new();
    while let Some(f) = dec.read_next_frame().unwrap() {
        frames.push((f.delay, f.buffer.to_vec()));
    }
    Decoded { width, height, palette, frames }
}

#[test]
fn default_animation_round_trips() {
    let params = CurveParams::default();
    let anim = build_animation(&params, 2.25);

    let mut buf = Vec::new();
    encode_gif(&anim, &mut buf).unwrap();
    assert_eq!(&buf[..6], b"GIF89a");
    assert_eq!(netscape_loops(&buf), Some(64));

    let d = decode(&buf);
    assert_eq!((d.width, d.height), (801, 801));
    assert_eq!(d.palette, PALETTE.to_vec());
    assert_eq!(d.palette.len() / 3, 2);
    assert_eq!(d.frames.len(), 64);
    for (delay, _) in &d.frames {
        assert_eq!(*delay, 8);
    }
    assert_eq!(d.frames[0].1.as_slice(), anim.frames()[0].pixels());
    assert_eq!(d.frames[63].1.as_slice(), anim.frames()[63].pixels());
}

#[test]
fn zero_loop_count_means_forever() {
    let params = CurveParams {
        size: 10,
        frames: 3,
        ..CurveParams::default()
    };
    let src = build_animation(&params, 0.5);
    let mut anim = Animation::new(0);
    for (f, d) in src.frames().iter().zip(src.delays()) {
        anim.push(f.clone(), *d);
    }

    let mut buf = Vec::new();
    encode_gif(&anim, &mut buf).unwrap();
    assert_eq!(netscape_loops(&buf), Some(0));
    assert_eq!(decode(&buf).frames.len(), 3);
}

#[test]
fn empty_animation_is_an_error() {
    let err = encode_gif(&Animation::new(1), Vec::new()).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "ENCODE");
}
