use std::fmt;

use crate::foundation::error::{GlyphReelError, GlyphReelResult};

/// Letter case of a glyph asset. Digits are always [`GlyphCase::Lower`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GlyphCase {
    Upper,
    Lower,
}

impl GlyphCase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
        }
    }
}

/// Identity of one pre-rendered glyph: a case plus the lower-case form of the character.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct GlyphKey {
    pub case: GlyphCase,
    pub ch: char,
}

impl GlyphKey {
    /// Build the key for a text character, or `None` when it is not alphanumeric.
    ///
    /// Characters whose lower-case mapping is not a single `char` (e.g. `İ`) are rejected too,
    /// since no asset file can be named after them.
    pub fn for_char(c: char) -> Option<Self> {
        if !c.is_alphanumeric() {
            return None;
        }
        let mut lower = c.to_lowercase();
        let ch = lower.next()?;
        if lower.next().is_some() {
            return None;
        }
        let case = if c.is_uppercase() {
            GlyphCase::Upper
        } else {
            GlyphCase::Lower
        };
        Some(Self { case, ch })
    }

    /// Parse a preview file stem such as `upper_a` or `lower_7`.
    pub fn from_stem(stem: &str) -> Option<Self> {
        let (case, rest) = stem.split_once('_')?;
        let case = match case {
            "upper" => GlyphCase::Upper,
            "lower" => GlyphCase::Lower,
            _ => return None,
        };
        let mut chars = rest.chars();
        let c = chars.next()?;
        if chars.next().is_some() || !c.is_alphanumeric() {
            return None;
        }
        let ch = c.to_lowercase().next()?;
        Some(Self { case, ch })
    }

    /// Preview image stem, `"{case}_{char}"`.
    pub fn stem(&self) -> String {
        format!("{}_{}", self.case.as_str(), self.ch)
    }

    /// Clip file name inside the per-case clip directory.
    pub fn clip_file_name(&self) -> String {
        format!("{}.mp4", self.ch)
    }
}

impl fmt::Display for GlyphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.case.as_str(), self.ch)
    }
}

/// Case transformation applied to the whole text before tokenizing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    Upper,
    Lower,
    #[default]
    Mixed,
}

impl CaseMode {
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
            Self::Mixed => text.to_string(),
        }
    }
}

/// One layout unit derived from the input text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextToken {
    Glyph(GlyphKey),
    Space,
}

/// What to do with characters that have no glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenPolicy {
    /// Drop the character and log a warning (interactive preview).
    Lenient,
    /// Fail the whole request (committed render).
    Strict,
}

/// Split `text` into glyph and space tokens.
///
/// Surrounding whitespace is trimmed and `case` applied first. An empty result is not an error.
pub fn tokenize(text: &str, case: CaseMode, policy: TokenPolicy) -> GlyphReelResult<Vec<TextToken>> {
    let text = case.apply(text.trim());
    let mut tokens = Vec::with_capacity(text.len());
    for (index, c) in text.chars().enumerate() {
        if c.is_whitespace() {
            tokens.push(TextToken::Space);
            continue;
        }
        match GlyphKey::for_char(c) {
            Some(key) => tokens.push(TextToken::Glyph(key)),
            None => match policy {
                TokenPolicy::Strict => {
                    return Err(GlyphReelError::UnsupportedCharacter { ch: c, index });
                }
                TokenPolicy::Lenient => {
                    tracing::warn!(ch = %c, index, "unsupported character skipped");
                }
            },
        }
    }
    Ok(tokens)
}

#[cfg(test)]
#[path = "../../tests/unit/text/tokens.rs"]
mod tests;
