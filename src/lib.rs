//! glyphreel lays out text as a row of pre-rendered glyphs and screen-blends them together.
//!
//! The same layout feeds two outputs that must look identical:
//!
//! 1. **Preview**: [`composite`] folds resized glyph rasters into a [`CompositeFrame`].
//! 2. **Render**: [`FilterGraphBuilder`] emits an [`OperationGraph`] that `ffmpeg` evaluates over
//!    the per-glyph clips, run through [`FfmpegCommand`].
//!
//! # Pipeline overview
//!
//! - **Tokenize**: `text + CaseMode -> [TextToken]` ([`tokenize`])
//! - **Layout**: `tokens + LayoutParameters -> TextLayout` ([`layout`]), pure and deterministic
//! - **Composite** or **build graph**, then optionally **encode**
//!
//! Asset stores ([`PreviewGlyphs`], [`ClipGlyphs`]) are loaded once up front; nothing after that
//! touches the filesystem except the encoder.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod encode;
mod foundation;
mod graph;
mod layout;
mod pipeline;
mod render;
mod text;

pub use assets::decode::{decode_glyph_image, read_glyph_image};
pub use assets::store::{
    ClipGlyphs, GlyphAssetStore, GlyphMetrics, GlyphRaster, PreviewGlyphs, UniformMetrics,
    WidthRatios,
};
pub use config::Settings;
pub use encode::ffmpeg::{
    EncodeConfig, FfmpegCommand, FfmpegJob, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use foundation::core::{Canvas, Fps};
pub use foundation::error::{GlyphReelError, GlyphReelResult};
pub use graph::builder::FilterGraphBuilder;
pub use graph::fingerprint::GraphFingerprint;
pub use graph::model::{GraphNode, Label, OperationGraph, SourceColor};
pub use layout::engine::{
    LayoutParameters, OVERFLOW_THRESHOLD, PlacedGlyph, ScaleDecision, TextLayout, layout,
};
pub use pipeline::{RenderPlan, output_file_name, plan_render, preview_text, render_clip};
pub use render::blend::{Rgba8, SCREEN_BLEND_MODE, screen, screen_in_place};
pub use render::composite::{CompositeFrame, composite, glyph_layer, screen_layer};
pub use text::tokens::{CaseMode, GlyphCase, GlyphKey, TextToken, TokenPolicy, tokenize};
