use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{
    assets::store::WidthRatios,
    encode::ffmpeg::EncodeConfig,
    foundation::core::{Canvas, Fps},
    foundation::error::{GlyphReelError, GlyphReelResult},
    layout::engine::LayoutParameters,
};

/// Everything the preview and render paths are parameterized by.
///
/// Loaded from JSON; missing fields take the defaults of [`Settings::default`]. Relative
/// directories are resolved against the directory passed to [`Settings::resolve_dirs`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Glyph height and default width in pixels.
    pub base_char_size: u32,
    /// Inter-glyph spacing as a fraction of `base_char_size`, in `[-1.0, 0.0]`.
    pub spacing_factor: f64,
    /// Space advance in pixels.
    pub space_width: u32,
    /// Size of the preview frame.
    pub preview_canvas: Canvas,
    /// Size of the rendered clip.
    pub render_canvas: Canvas,
    /// Clip duration in seconds.
    pub duration_secs: f64,
    /// Clip frame rate.
    pub fps: Fps,
    /// Encoder flags for the rendered clip.
    pub encode: EncodeConfig,
    /// Directory of `{case}_{char}.png` preview images.
    pub preview_dir: PathBuf,
    /// Directory of lower-case (and digit) glyph clips.
    pub clips_lower_dir: PathBuf,
    /// Directory of upper-case glyph clips.
    pub clips_upper_dir: PathBuf,
    /// Per-character width multipliers; characters not listed use 1.0.
    pub width_ratios: WidthRatios,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_char_size: 150,
            spacing_factor: -0.7,
            space_width: 20,
            preview_canvas: Canvas {
                width: 800,
                height: 450,
            },
            render_canvas: Canvas {
                width: 1920,
                height: 1080,
            },
            duration_secs: 10.0,
            fps: Fps { num: 25, den: 1 },
            encode: EncodeConfig::default(),
            preview_dir: PathBuf::from("PreviewImages"),
            clips_lower_dir: PathBuf::from("Source").join("LOWER_CASE"),
            clips_upper_dir: PathBuf::from("Source").join("UPPER_CASE"),
            width_ratios: WidthRatios::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> GlyphReelResult<Self> {
        let settings: Self = serde_json::from_reader(r)
            .map_err(|e| GlyphReelError::serde(format!("parse settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> GlyphReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            GlyphReelError::validation(format!("open settings JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> GlyphReelResult<()> {
        self.preview_params().validate()?;
        self.render_params().validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(GlyphReelError::validation(format!(
                "duration_secs must be finite and > 0, got {}",
                self.duration_secs
            )));
        }
        if !self.render_canvas.width.is_multiple_of(2) || !self.render_canvas.height.is_multiple_of(2)
        {
            return Err(GlyphReelError::validation(
                "render canvas width/height must be even (required for yuv420p output)",
            ));
        }
        self.encode.validate()?;
        self.width_ratios.validate()
    }

    /// Layout parameters for `canvas`.
    pub fn layout_params(&self, canvas: Canvas) -> LayoutParameters {
        LayoutParameters {
            base_char_size: self.base_char_size,
            spacing_factor: self.spacing_factor,
            space_width: self.space_width,
            canvas,
        }
    }

    pub fn preview_params(&self) -> LayoutParameters {
        self.layout_params(self.preview_canvas)
    }

    pub fn render_params(&self) -> LayoutParameters {
        self.layout_params(self.render_canvas)
    }

    /// Join relative asset directories onto `root`.
    pub fn resolve_dirs(mut self, root: &Path) -> Self {
        for dir in [
            &mut self.preview_dir,
            &mut self.clips_lower_dir,
            &mut self.clips_upper_dir,
        ] {
            if dir.is_relative() {
                *dir = root.join(&*dir);
            }
        }
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
