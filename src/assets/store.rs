use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode,
    foundation::error::{GlyphReelError, GlyphReelResult},
    text::tokens::{GlyphCase, GlyphKey},
};

#[derive(Clone, Debug)]
/// Decoded glyph image in straight-alpha RGBA8 form.
pub struct GlyphRaster {
    /// Shared pixel data; never mutated after load.
    pub image: Arc<image::RgbaImage>,
}

impl GlyphRaster {
    /// Wrap an already decoded image.
    pub fn new(image: image::RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Per-glyph width multipliers consulted by the layout engine.
pub trait GlyphMetrics {
    /// Multiplier applied to the base character size for this glyph's width.
    fn width_ratio(&self, _key: &GlyphKey) -> f64 {
        1.0
    }
}

/// Every glyph is exactly `base_char_size` wide.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformMetrics;

impl GlyphMetrics for UniformMetrics {}

/// Width multipliers keyed by lower-case character, shared by both cases.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct WidthRatios(BTreeMap<char, f64>);

impl WidthRatios {
    /// `m` and `w` drawn 1.2x wide, everything else at 1.0.
    pub fn wide_mw() -> Self {
        Self(BTreeMap::from([('m', 1.2), ('w', 1.2)]))
    }

    /// Set the ratio for `ch`.
    pub fn insert(&mut self, ch: char, ratio: f64) -> GlyphReelResult<()> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(GlyphReelError::validation(format!(
                "width ratio for '{ch}' must be finite and > 0, got {ratio}"
            )));
        }
        self.0.insert(ch.to_lowercase().next().unwrap_or(ch), ratio);
        Ok(())
    }

    /// Check every stored ratio (used after deserializing).
    pub fn validate(&self) -> GlyphReelResult<()> {
        for (&ch, &ratio) in &self.0 {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(GlyphReelError::validation(format!(
                    "width ratio for '{ch}' must be finite and > 0, got {ratio}"
                )));
            }
        }
        Ok(())
    }

    /// Ratio for `ch`, defaulting to 1.0.
    pub fn get(&self, ch: char) -> f64 {
        self.0.get(&ch).copied().unwrap_or(1.0)
    }
}

impl GlyphMetrics for WidthRatios {
    fn width_ratio(&self, key: &GlyphKey) -> f64 {
        self.get(key.ch)
    }
}

/// Read-only mapping from [`GlyphKey`] to a glyph asset.
///
/// Implementations are populated once and never mutated afterwards.
pub trait GlyphAssetStore: GlyphMetrics {
    /// Asset representation handed out by this store.
    type Asset;

    /// Look up the asset for `key`.
    fn resolve(&self, key: &GlyphKey) -> Option<&Self::Asset>;

    /// Whether `key` has an asset.
    fn exists(&self, key: &GlyphKey) -> bool {
        self.resolve(key).is_some()
    }
}

#[derive(Clone, Debug, Default)]
/// Decoded preview rasters, one per glyph key.
pub struct PreviewGlyphs {
    rasters: HashMap<GlyphKey, GlyphRaster>,
    ratios: WidthRatios,
}

impl PreviewGlyphs {
    /// Build a store from already decoded rasters.
    pub fn from_rasters(
        rasters: impl IntoIterator<Item = (GlyphKey, GlyphRaster)>,
        ratios: WidthRatios,
    ) -> Self {
        Self {
            rasters: rasters.into_iter().collect(),
            ratios,
        }
    }

    /// Decode every `{case}_{char}.png` in `dir`.
    ///
    /// Files whose stem is not a glyph key are ignored.
    #[tracing::instrument(skip(ratios))]
    pub fn load_dir(dir: &Path, ratios: WidthRatios) -> GlyphReelResult<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read preview directory '{}'", dir.display()))?;

        let mut rasters = HashMap::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("list preview directory '{}'", dir.display()))?
                .path();
            if !has_extension(&path, "png") {
                continue;
            }
            let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(GlyphKey::from_stem)
            else {
                tracing::debug!(path = %path.display(), "ignoring non-glyph preview file");
                continue;
            };
            rasters.insert(key, decode::read_glyph_image(&path)?);
        }

        tracing::info!(count = rasters.len(), "loaded preview glyphs");
        Ok(Self { rasters, ratios })
    }

    /// Number of loaded rasters.
    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    /// Whether no raster was loaded.
    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }
}

impl GlyphMetrics for PreviewGlyphs {
    fn width_ratio(&self, key: &GlyphKey) -> f64 {
        self.ratios.width_ratio(key)
    }
}

impl GlyphAssetStore for PreviewGlyphs {
    type Asset = GlyphRaster;

    fn resolve(&self, key: &GlyphKey) -> Option<&GlyphRaster> {
        self.rasters.get(key)
    }
}

#[derive(Clone, Debug, Default)]
/// Glyph clip files for the final render, one per glyph key.
pub struct ClipGlyphs {
    paths: HashMap<GlyphKey, PathBuf>,
    ratios: WidthRatios,
}

impl ClipGlyphs {
    /// Build a store from explicit paths.
    pub fn from_paths(
        paths: impl IntoIterator<Item = (GlyphKey, PathBuf)>,
        ratios: WidthRatios,
    ) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            ratios,
        }
    }

    /// Index `{char}.mp4` files in the lower- and upper-case clip directories.
    ///
    /// Only paths are recorded; the clips themselves are read by the render backend.
    #[tracing::instrument(skip(ratios))]
    pub fn scan(lower_dir: &Path, upper_dir: &Path, ratios: WidthRatios) -> GlyphReelResult<Self> {
        let mut paths = HashMap::new();
        for (case, dir) in [(GlyphCase::Lower, lower_dir), (GlyphCase::Upper, upper_dir)] {
            let entries = std::fs::read_dir(dir)
                .with_context(|| format!("read clip directory '{}'", dir.display()))?;
            for entry in entries {
                let path = entry
                    .with_context(|| format!("list clip directory '{}'", dir.display()))?
                    .path();
                if !has_extension(&path, "mp4") {
                    continue;
                }
                let Some(key) = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|stem| clip_key(case, stem))
                else {
                    tracing::debug!(path = %path.display(), "ignoring non-glyph clip file");
                    continue;
                };
                paths.insert(key, path);
            }
        }

        tracing::info!(count = paths.len(), "indexed glyph clips");
        Ok(Self { paths, ratios })
    }

    /// Number of indexed clips.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no clip was indexed.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl GlyphMetrics for ClipGlyphs {
    fn width_ratio(&self, key: &GlyphKey) -> f64 {
        self.ratios.width_ratio(key)
    }
}

impl GlyphAssetStore for ClipGlyphs {
    type Asset = PathBuf;

    fn resolve(&self, key: &GlyphKey) -> Option<&PathBuf> {
        self.paths.get(key)
    }
}

fn clip_key(case: GlyphCase, stem: &str) -> Option<GlyphKey> {
    let mut chars = stem.chars();
    let c = chars.next()?;
    if chars.next().is_some() || !c.is_alphanumeric() {
        return None;
    }
    // Digits only exist in lower case.
    if case == GlyphCase::Upper && !c.is_alphabetic() {
        return None;
    }
    Some(GlyphKey {
        case,
        ch: c.to_lowercase().next()?,
    })
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
