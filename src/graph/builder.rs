use crate::{
    foundation::core::{Canvas, Fps},
    foundation::error::{GlyphReelError, GlyphReelResult},
    graph::model::{GraphNode, Label, OperationGraph, SourceColor},
    layout::engine::PlacedGlyph,
    render::blend::SCREEN_BLEND_MODE,
};

/// Emits the [`OperationGraph`] that reproduces [`crate::composite`] in the render backend.
///
/// Per glyph: scale the clip, overlay it on a transparent canvas at its position, then
/// screen-blend that canvas into the running accumulator, which starts as opaque black.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterGraphBuilder {
    canvas: Canvas,
    duration_secs: f64,
    fps: Fps,
}

impl FilterGraphBuilder {
    pub fn new(canvas: Canvas, duration_secs: f64, fps: Fps) -> GlyphReelResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(GlyphReelError::validation(
                "graph canvas width/height must be non-zero",
            ));
        }
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(GlyphReelError::validation(format!(
                "duration must be finite and > 0, got {duration_secs}"
            )));
        }
        Ok(Self {
            canvas,
            duration_secs,
            fps,
        })
    }

    /// Build the graph for `glyphs`, which must be in text order.
    ///
    /// Labels are derived from each glyph's token index, so the same placed glyphs always give
    /// byte-identical graphs.
    pub fn build<'a>(&self, glyphs: impl IntoIterator<Item = &'a PlacedGlyph>) -> OperationGraph {
        let background = Label::new("bg");
        let mut nodes = vec![GraphNode::Color {
            color: SourceColor::OpaqueBlack,
            canvas: self.canvas,
            duration_secs: self.duration_secs,
            rate: Some(self.fps),
            output: background.clone(),
        }];
        let mut inputs = Vec::new();
        let mut current = background;

        for glyph in glyphs {
            let i = glyph.token_index;
            let scaled = Label::new(format!("s{i}"));
            let canvas = Label::new(format!("tmp{i}"));
            let placed = Label::new(format!("overlay{i}"));
            let blended = Label::new(format!("blend{i}"));

            nodes.push(GraphNode::Scale {
                input: inputs.len(),
                width: glyph.width,
                height: glyph.height,
                output: scaled.clone(),
            });
            nodes.push(GraphNode::Color {
                color: SourceColor::TransparentBlack,
                canvas: self.canvas,
                duration_secs: self.duration_secs,
                rate: None,
                output: canvas.clone(),
            });
            nodes.push(GraphNode::Overlay {
                base: canvas,
                top: scaled,
                x: glyph.x,
                y: glyph.y,
                output: placed.clone(),
            });
            nodes.push(GraphNode::Blend {
                base: current,
                top: placed,
                mode: SCREEN_BLEND_MODE.to_string(),
                output: blended.clone(),
            });

            inputs.push(glyph.key);
            current = blended;
        }

        OperationGraph {
            inputs,
            nodes,
            output: current,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/builder.rs"]
mod tests;
