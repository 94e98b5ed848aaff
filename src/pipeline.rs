use std::path::{Path, PathBuf};

use crate::{
    assets::store::{GlyphAssetStore, GlyphRaster},
    config::Settings,
    encode::ffmpeg::FfmpegCommand,
    foundation::error::{GlyphReelError, GlyphReelResult},
    graph::builder::FilterGraphBuilder,
    graph::model::OperationGraph,
    layout::engine::{TextLayout, layout},
    render::composite::{CompositeFrame, composite},
    text::tokens::{CaseMode, TokenPolicy, tokenize},
};

/// Composite the preview frame for `text`.
///
/// Unsupported characters and glyphs without a raster are skipped with a warning. Empty text
/// yields the bare black background.
#[tracing::instrument(skip(settings, glyphs))]
pub fn preview_text<S>(
    text: &str,
    case: CaseMode,
    settings: &Settings,
    glyphs: &S,
) -> GlyphReelResult<CompositeFrame>
where
    S: GlyphAssetStore<Asset = GlyphRaster> + ?Sized,
{
    let params = settings.preview_params();
    params.validate()?;

    let background = CompositeFrame::black(params.canvas);
    let tokens = tokenize(text, case, TokenPolicy::Lenient)?;
    let Some(layout) = layout(&tokens, &params, glyphs) else {
        return Ok(background);
    };
    composite(&background, &layout, glyphs)
}

/// Everything needed to run one committed render.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    /// Text after trimming and case mapping.
    pub text: String,
    pub layout: TextLayout,
    pub graph: OperationGraph,
    pub command: FfmpegCommand,
}

/// Validate `text` against the clip store and build the render command, without running it.
///
/// Fails before anything is spawned on an unsupported character or a missing clip. Empty text
/// gives `Ok(None)`.
#[tracing::instrument(skip(settings, clips))]
pub fn plan_render<S>(
    text: &str,
    case: CaseMode,
    settings: &Settings,
    clips: &S,
    out_dir: &Path,
) -> GlyphReelResult<Option<RenderPlan>>
where
    S: GlyphAssetStore<Asset = PathBuf> + ?Sized,
{
    settings.validate()?;

    let tokens = tokenize(text, case, TokenPolicy::Strict)?;
    let Some(layout) = layout(&tokens, &settings.render_params(), clips) else {
        tracing::info!("empty text, nothing to render");
        return Ok(None);
    };

    let input_paths = layout
        .glyphs()
        .map(|g| {
            clips
                .resolve(&g.key)
                .cloned()
                .ok_or(GlyphReelError::MissingAsset(g.key))
        })
        .collect::<GlyphReelResult<Vec<_>>>()?;

    let graph = FilterGraphBuilder::new(settings.render_canvas, settings.duration_secs, settings.fps)?
        .build(layout.glyphs());

    let text = case.apply(text.trim());
    let command = FfmpegCommand::new(
        &graph,
        &input_paths,
        settings.fps,
        settings.duration_secs,
        out_dir.join(output_file_name(&text)),
        &settings.encode,
    )?;

    tracing::info!(
        glyphs = layout.glyph_count(),
        scale = layout.scale.factor,
        fingerprint = %graph.fingerprint(),
        out = %command.out_path.display(),
        "render planned"
    );

    Ok(Some(RenderPlan {
        text,
        layout,
        graph,
        command,
    }))
}

/// Run a planned render to completion and return the written file.
pub fn render_clip(plan: RenderPlan) -> GlyphReelResult<PathBuf> {
    plan.command.run()
}

/// Destination name for a render of `text`: `generated_{text}.mp4`, whitespace as `_`.
pub fn output_file_name(text: &str) -> String {
    let stem: String = text
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_alphanumeric() {
                Some(c)
            } else {
                None
            }
        })
        .collect();
    format!("generated_{stem}.mp4")
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
