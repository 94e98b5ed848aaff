//! The screen blend operator.
//!
//! This is the only definition of the operator. The raster preview calls [`screen`] per pixel,
//! and the filter graph emits [`SCREEN_BLEND_MODE`] so that ffmpeg's `blend` filter applies the
//! same `1 - (1 - bg) * (1 - fg)` per channel.

use crate::foundation::error::{GlyphReelError, GlyphReelResult};

/// Mode name passed to ffmpeg's `blend=all_mode=...` for this operator.
pub const SCREEN_BLEND_MODE: &str = "screen";

/// One RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Screen-blend `fg` onto `bg`.
///
/// Channels are normalized to `[0, 1]`, color is screened, alpha is
/// `a_bg + a_fg * (1 - a_bg)` (written as `1 - (1 - a_bg) * (1 - a_fg)`, the same value), color
/// is then premultiplied by the output alpha and everything is re-quantized with rounding.
///
/// Commutative for a single pair; a fold over several layers is not order-independent.
pub fn screen(bg: Rgba8, fg: Rgba8) -> Rgba8 {
    let alpha = screen_channel(unit(bg[3]), unit(fg[3])).clamp(0.0, 1.0);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = screen_channel(unit(bg[i]), unit(fg[i])).clamp(0.0, 1.0);
        out[i] = quantize(c * alpha);
    }
    out[3] = quantize(alpha);
    out
}

/// Apply [`screen`] pixel-wise, folding `src` into `dst`.
pub fn screen_in_place(dst: &mut [u8], src: &[u8]) -> GlyphReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(GlyphReelError::validation(
            "screen_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = screen([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn screen_channel(a: f64, b: f64) -> f64 {
    1.0 - (1.0 - a) * (1.0 - b)
}

fn unit(v: u8) -> f64 {
    f64::from(v) / 255.0
}

fn quantize(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
