use image::{RgbaImage, imageops};

use crate::{
    assets::store::{GlyphAssetStore, GlyphRaster},
    foundation::core::Canvas,
    foundation::error::{GlyphReelError, GlyphReelResult},
    layout::engine::{PlacedGlyph, TextLayout},
    render::blend,
};

/// A composited RGBA8 frame.
///
/// Pixels written by the screen blend are premultiplied by their alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl CompositeFrame {
    /// A frame filled with one color.
    pub fn solid(canvas: Canvas, rgba: blend::Rgba8) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: rgba.repeat(canvas.pixel_len()),
        }
    }

    /// Opaque black, the background both render paths start from.
    pub fn black(canvas: Canvas) -> Self {
        Self::solid(canvas, [0, 0, 0, 255])
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<blend::Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn from_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    pub fn to_image(&self) -> GlyphReelResult<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| GlyphReelError::validation("frame data size mismatch with width*height*4"))
    }

    /// Drop alpha for display; color is already premultiplied over the black background.
    pub fn to_rgb_image(&self) -> GlyphReelResult<image::RgbImage> {
        Ok(image::DynamicImage::ImageRgba8(self.to_image()?).to_rgb8())
    }
}

/// Resize `raster` to the glyph's size and paste it onto a transparent canvas-sized layer.
///
/// Parts falling outside the canvas are clipped.
pub fn glyph_layer(raster: &GlyphRaster, glyph: &PlacedGlyph, canvas: Canvas) -> RgbaImage {
    let resized = imageops::resize(
        raster.image.as_ref(),
        glyph.width,
        glyph.height,
        imageops::FilterType::Lanczos3,
    );
    let mut layer = RgbaImage::new(canvas.width, canvas.height);
    imageops::overlay(&mut layer, &resized, glyph.x, glyph.y);
    layer
}

/// Screen-blend one canvas-sized layer into the accumulator.
pub fn screen_layer(mut acc: CompositeFrame, layer: &RgbaImage) -> GlyphReelResult<CompositeFrame> {
    if layer.dimensions() != (acc.width, acc.height) {
        return Err(GlyphReelError::validation(format!(
            "layer size mismatch: got {}x{}, expected {}x{}",
            layer.width(),
            layer.height(),
            acc.width,
            acc.height
        )));
    }
    blend::screen_in_place(&mut acc.data, layer.as_raw())?;
    Ok(acc)
}

/// Fold every placed glyph of `layout` into `background`, in text order.
///
/// Glyphs without a raster in `assets` are skipped with a warning; their space stays reserved.
#[tracing::instrument(skip_all, fields(glyphs = layout.glyph_count()))]
pub fn composite<S>(
    background: &CompositeFrame,
    layout: &TextLayout,
    assets: &S,
) -> GlyphReelResult<CompositeFrame>
where
    S: GlyphAssetStore<Asset = GlyphRaster> + ?Sized,
{
    if background.canvas() != layout.canvas {
        return Err(GlyphReelError::validation(format!(
            "background is {}x{} but layout targets {}x{}",
            background.width, background.height, layout.canvas.width, layout.canvas.height
        )));
    }

    layout.glyphs().try_fold(background.clone(), |acc, glyph| {
        let Some(raster) = assets.resolve(&glyph.key) else {
            tracing::warn!(key = %glyph.key, "no preview raster, glyph skipped");
            return Ok(acc);
        };
        let layer = glyph_layer(raster, glyph, layout.canvas);
        screen_layer(acc, &layer)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
