use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{assets::store::GlyphRaster, foundation::error::GlyphReelResult};

/// Decode encoded image bytes into a straight-alpha RGBA8 glyph raster.
///
/// Glyph rasters stay unpremultiplied: the screen blend normalizes straight channels and
/// premultiplies its own output.
pub fn decode_glyph_image(bytes: &[u8]) -> GlyphReelResult<GlyphRaster> {
    let dyn_img = image::load_from_memory(bytes).context("decode glyph image from memory")?;
    Ok(GlyphRaster {
        image: Arc::new(dyn_img.to_rgba8()),
    })
}

/// Read and decode a glyph image from disk.
pub fn read_glyph_image(path: &Path) -> GlyphReelResult<GlyphRaster> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read glyph image '{}'", path.display()))?;
    let dyn_img = image::load_from_memory(&bytes)
        .with_context(|| format!("decode glyph image '{}'", path.display()))?;
    Ok(GlyphRaster {
        image: Arc::new(dyn_img.to_rgba8()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
