use crate::foundation::error::{GlyphReelError, GlyphReelResult};

/// Frame rate as a rational number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> GlyphReelResult<Self> {
        if den == 0 {
            return Err(GlyphReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(GlyphReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Rate in the form ffmpeg accepts for `r=` and `-r` (`25`, `30000/1001`).
    pub fn to_ffmpeg_rate(self) -> String {
        if self.den == 1 {
            self.num.to_string()
        } else {
            format!("{}/{}", self.num, self.den)
        }
    }
}

/// Pixel dimensions of a preview frame or rendered clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> GlyphReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlyphReelError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_len(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
