use crate::text::tokens::GlyphKey;

/// Convenience result type used across glyphreel.
pub type GlyphReelResult<T> = Result<T, GlyphReelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GlyphReelError {
    /// Invalid user-provided parameters or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A character no glyph asset can exist for: neither alphanumeric nor whitespace, or an
    /// alphanumeric character whose lower-case form is more than one `char` (e.g. `İ`), which
    /// cannot name an asset file.
    #[error("unsupported character '{ch}' at index {index}")]
    UnsupportedCharacter {
        /// The offending character.
        ch: char,
        /// Character index into the (trimmed, case-mapped) text.
        index: usize,
    },

    /// An accepted character has no asset in the store.
    #[error("missing glyph asset for {0}")]
    MissingAsset(GlyphKey),

    /// The external render backend exited unsuccessfully.
    #[error("render backend exited with status {status}: {stderr}")]
    BackendExecution {
        /// Exit status as reported by the OS.
        status: String,
        /// Captured diagnostic output, verbatim.
        stderr: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlyphReelError {
    /// Build a [`GlyphReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlyphReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`GlyphReelError::BackendExecution`] value.
    pub fn backend(status: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::BackendExecution {
            status: status.into(),
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
