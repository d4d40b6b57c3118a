use std::path::Path;

use anyhow::Context;

use crate::foundation::{
    core::Resolution,
    error::{ReelError, ReelResult},
};

/// Opaque RGBA8 pixels ready for the encoder pipe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub resolution: Resolution,
    /// Row-major, tightly packed, alpha always 255.
    pub data: Vec<u8>,
}

/// Decode the still at `path`, check it against the image set's size and flatten its alpha over
/// `bg_rgba`.
pub fn decode_still(path: &Path, expected: Resolution, bg_rgba: [u8; 4]) -> ReelResult<Frame> {
    let bytes = std::fs::read(path).with_context(|| format!("read still '{}'", path.display()))?;
    let frame = decode_still_bytes(&bytes, bg_rgba)
        .map_err(|e| ReelError::decode(format!("'{}': {e}", path.display())))?;

    if frame.resolution != expected {
        return Err(ReelError::decode(format!(
            "'{}' is {}, expected {expected}",
            path.display(),
            frame.resolution
        )));
    }
    Ok(frame)
}

pub fn decode_still_bytes(bytes: &[u8], bg_rgba: [u8; 4]) -> ReelResult<Frame> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut data = rgba.into_raw();
    flatten_straight_over_bg(&mut data, bg_rgba);

    Ok(Frame {
        resolution: Resolution::new(width, height),
        data,
    })
}

fn flatten_straight_over_bg(rgba: &mut [u8], bg_rgba: [u8; 4]) {
    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];

    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let v = mul_div255(u16::from(px[c]), a) + mul_div255(bg[c], inv);
            px[c] = v.min(255) as u8;
        }
        px[3] = 255;
    }
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
