use crate::{
    assets::store::GlyphMetrics,
    foundation::core::Canvas,
    foundation::error::{GlyphReelError, GlyphReelResult},
    text::tokens::{GlyphKey, TextToken},
};

/// Share of the canvas width that laid-out text may occupy before it is scaled down.
pub const OVERFLOW_THRESHOLD: f64 = 0.9;

/// Inputs to a single [`layout`] call.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutParameters {
    /// Glyph height, and glyph width before any width ratio, in pixels.
    pub base_char_size: u32,
    /// Spacing between glyphs as a fraction of `base_char_size`, in `[-1.0, 0.0]`.
    pub spacing_factor: f64,
    /// Cursor advance for a space, in pixels.
    pub space_width: u32,
    /// Target frame size.
    pub canvas: Canvas,
}

impl LayoutParameters {
    pub fn new(
        base_char_size: u32,
        spacing_factor: f64,
        space_width: u32,
        canvas: Canvas,
    ) -> GlyphReelResult<Self> {
        let params = Self {
            base_char_size,
            spacing_factor,
            space_width,
            canvas,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> GlyphReelResult<()> {
        if self.base_char_size == 0 {
            return Err(GlyphReelError::validation("base_char_size must be > 0"));
        }
        if !(-1.0..=0.0).contains(&self.spacing_factor) {
            return Err(GlyphReelError::validation(format!(
                "spacing_factor must be within [-1.0, 0.0], got {}",
                self.spacing_factor
            )));
        }
        if self.space_width == 0 {
            return Err(GlyphReelError::validation("space_width must be > 0"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(GlyphReelError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(())
    }

    /// Same glyph parameters on another canvas.
    pub fn with_canvas(self, canvas: Canvas) -> Self {
        Self { canvas, ..self }
    }
}

/// A glyph with its final absolute position and size on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedGlyph {
    /// Index of the token this glyph came from.
    pub token_index: usize,
    pub key: GlyphKey,
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Global shrink factor applied when text would overflow the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleDecision {
    /// In `(0, 1]`; exactly 1.0 unless scaling happened.
    pub factor: f64,
}

impl ScaleDecision {
    pub const NONE: Self = Self { factor: 1.0 };

    /// Decide the factor for content `total_width` pixels wide.
    pub fn for_width(total_width: i64, canvas_width: u32) -> Self {
        let threshold = f64::from(canvas_width) * OVERFLOW_THRESHOLD;
        let total = total_width as f64;
        if total_width > 0 && total > threshold {
            Self {
                factor: threshold / total,
            }
        } else {
            Self::NONE
        }
    }

    pub fn is_scaled(self) -> bool {
        self.factor < 1.0
    }

    /// Rescale one quantity, truncating toward zero.
    pub fn apply(self, v: i64) -> i64 {
        if self.is_scaled() {
            (v as f64 * self.factor) as i64
        } else {
            v
        }
    }
}

/// Result of laying out a non-empty token sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    /// One entry per input token; `None` for spaces.
    pub slots: Vec<Option<PlacedGlyph>>,
    pub scale: ScaleDecision,
    /// Sum of all advances before scaling.
    pub unscaled_width: i64,
    /// Content width after scaling, as used for centering.
    pub total_width: i64,
    /// Inter-glyph spacing after scaling.
    pub char_spacing: i64,
    /// Space advance after scaling.
    pub space_width: i64,
    pub canvas: Canvas,
}

impl TextLayout {
    /// Placed glyphs in text order.
    pub fn glyphs(&self) -> impl Iterator<Item = &PlacedGlyph> {
        self.slots.iter().flatten()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs().count()
    }
}

/// Place `tokens` on the canvas described by `params`.
///
/// Returns `None` for an empty token sequence. Spacing only appears between glyphs, never before
/// the first or after the last. When the content is wider than [`OVERFLOW_THRESHOLD`] of the
/// canvas, every size and position is scaled down uniformly (truncating each quantity) and the
/// block is centered horizontally; each glyph is centered vertically.
pub fn layout<M>(tokens: &[TextToken], params: &LayoutParameters, metrics: &M) -> Option<TextLayout>
where
    M: GlyphMetrics + ?Sized,
{
    if tokens.is_empty() {
        return None;
    }

    let base = i64::from(params.base_char_size);
    let char_spacing = (base as f64 * params.spacing_factor).round() as i64;
    let space_width = i64::from(params.space_width);

    // (key, relative x, width) before scaling.
    let mut pending = Vec::<Option<(GlyphKey, i64, i64)>>::with_capacity(tokens.len());
    let mut cursor = 0i64;
    let mut emitted = 0usize;
    for token in tokens {
        match token {
            TextToken::Space => {
                cursor += space_width;
                pending.push(None);
            }
            TextToken::Glyph(key) => {
                if emitted > 0 {
                    cursor += char_spacing;
                }
                let width = (base as f64 * metrics.width_ratio(key)).round() as i64;
                pending.push(Some((*key, cursor, width)));
                cursor += width;
                emitted += 1;
            }
        }
    }

    let unscaled_width = cursor;
    let scale = ScaleDecision::for_width(unscaled_width, params.canvas.width);
    let height = scale.apply(base).max(1);
    let total_width = scale.apply(unscaled_width);

    let x_offset = (i64::from(params.canvas.width) - total_width).div_euclid(2);
    let y = (i64::from(params.canvas.height) - height).div_euclid(2);

    tracing::debug!(
        glyphs = emitted,
        unscaled_width,
        total_width,
        scale = scale.factor,
        x_offset,
        "laid out text"
    );

    let slots = pending
        .into_iter()
        .enumerate()
        .map(|(token_index, slot)| {
            slot.map(|(key, rel_x, width)| PlacedGlyph {
                token_index,
                key,
                x: x_offset + scale.apply(rel_x),
                y,
                width: to_extent(scale.apply(width)),
                height: to_extent(height),
            })
        })
        .collect();

    Some(TextLayout {
        slots,
        scale,
        unscaled_width,
        total_width,
        char_spacing: scale.apply(char_spacing),
        space_width: scale.apply(space_width),
        canvas: params.canvas,
    })
}

fn to_extent(v: i64) -> u32 {
    u32::try_from(v.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
