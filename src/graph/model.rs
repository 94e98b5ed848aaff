use std::{
    collections::{BTreeSet, HashSet},
    fmt,
};

use crate::{
    foundation::core::{Canvas, Fps},
    foundation::error::{GlyphReelError, GlyphReelResult},
    graph::fingerprint::{GraphFingerprint, fingerprint_graph},
    text::tokens::GlyphKey,
};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Name of a stream produced by exactly one [`GraphNode`].
pub struct Label(String);

impl Label {
    /// Wrap a label name (without brackets).
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Label name without brackets.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Fill of a generated color source.
pub enum SourceColor {
    /// Fully opaque black (`black`).
    OpaqueBlack,
    /// Fully transparent black (`black@0`).
    TransparentBlack,
}

impl SourceColor {
    fn as_ffmpeg(self) -> &'static str {
        match self {
            Self::OpaqueBlack => "black",
            Self::TransparentBlack => "black@0",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
/// One operation of an [`OperationGraph`].
pub enum GraphNode {
    /// Generated solid-color source covering the whole canvas.
    Color {
        /// Fill color.
        color: SourceColor,
        /// Source size.
        canvas: Canvas,
        /// Source duration in seconds.
        duration_secs: f64,
        /// Explicit frame rate, if any.
        rate: Option<Fps>,
        /// Produced stream.
        output: Label,
    },
    /// Scale backend input `input` to `width`x`height` with square pixels in planar RGB.
    Scale {
        /// Index into [`OperationGraph::inputs`].
        input: usize,
        /// Target width in pixels.
        width: u32,
        /// Target height in pixels.
        height: u32,
        /// Produced stream.
        output: Label,
    },
    /// Place `top` at `(x, y)` on `base`.
    Overlay {
        /// Bottom stream.
        base: Label,
        /// Stream placed on top.
        top: Label,
        /// Horizontal position of `top`.
        x: i64,
        /// Vertical position of `top`.
        y: i64,
        /// Produced stream.
        output: Label,
    },
    /// Blend `top` into `base` with `mode` on all planes, ending with the shorter input.
    Blend {
        /// Accumulated stream.
        base: Label,
        /// Stream blended in.
        top: Label,
        /// Blend mode name understood by the backend.
        mode: String,
        /// Produced stream.
        output: Label,
    },
}

impl GraphNode {
    /// The single label this node declares.
    pub fn output(&self) -> &Label {
        match self {
            Self::Color { output, .. }
            | Self::Scale { output, .. }
            | Self::Overlay { output, .. }
            | Self::Blend { output, .. } => output,
        }
    }

    /// Labels this node consumes, in input order.
    pub fn label_inputs(&self) -> Vec<&Label> {
        match self {
            Self::Color { .. } | Self::Scale { .. } => vec![],
            Self::Overlay { base, top, .. } | Self::Blend { base, top, .. } => vec![base, top],
        }
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color {
                color,
                canvas,
                duration_secs,
                rate,
                output,
            } => {
                write!(
                    f,
                    "color={}:s={}x{}:d={}",
                    color.as_ffmpeg(),
                    canvas.width,
                    canvas.height,
                    duration_secs
                )?;
                if let Some(rate) = rate {
                    write!(f, ":r={}", rate.to_ffmpeg_rate())?;
                }
                write!(f, "{output}")
            }
            Self::Scale {
                input,
                width,
                height,
                output,
            } => write!(
                f,
                "[{input}:v]scale={width}:{height},setsar=1,format=gbrp{output}"
            ),
            Self::Overlay {
                base,
                top,
                x,
                y,
                output,
            } => write!(f, "{base}{top}overlay=x={x}:y={y}:format=auto{output}"),
            Self::Blend {
                base,
                top,
                mode,
                output,
            } => write!(f, "{base}{top}blend=all_mode='{mode}':shortest=1{output}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Declarative filter chain equivalent to compositing a laid-out text.
///
/// `Display` renders the `-filter_complex` description: nodes in order, separated by `;`,
/// without a trailing separator.
pub struct OperationGraph {
    /// Backend inputs in stream order; input `n` is referenced as `[n:v]`.
    pub inputs: Vec<GlyphKey>,
    /// Nodes in emission order.
    pub nodes: Vec<GraphNode>,
    /// Designated final stream.
    pub output: Label,
}

impl OperationGraph {
    /// Serialize to the backend's filter description.
    pub fn to_filter_complex(&self) -> String {
        self.to_string()
    }

    /// Stable hash of the graph, for callers that cache renders.
    pub fn fingerprint(&self) -> GraphFingerprint {
        fingerprint_graph(self)
    }

    /// Check labels are assigned once, declared before use and consumed exactly once, except
    /// the output which must not be consumed; and every backend input is scaled exactly once.
    pub fn validate(&self) -> GlyphReelResult<()> {
        let mut declared = HashSet::<&Label>::new();
        let mut consumed = HashSet::<&Label>::new();
        let mut used_inputs = BTreeSet::<usize>::new();

        for (idx, node) in self.nodes.iter().enumerate() {
            for label in node.label_inputs() {
                if !declared.contains(label) {
                    return Err(GlyphReelError::validation(format!(
                        "node {idx} reads {label} before it is declared"
                    )));
                }
                if !consumed.insert(label) {
                    return Err(GlyphReelError::validation(format!(
                        "label {label} is consumed more than once"
                    )));
                }
            }
            if let GraphNode::Scale { input, .. } = node {
                if *input >= self.inputs.len() {
                    return Err(GlyphReelError::validation(format!(
                        "node {idx} reads backend input {input}, only {} declared",
                        self.inputs.len()
                    )));
                }
                if !used_inputs.insert(*input) {
                    return Err(GlyphReelError::validation(format!(
                        "backend input {input} is scaled more than once"
                    )));
                }
            }
            if !declared.insert(node.output()) {
                return Err(GlyphReelError::validation(format!(
                    "label {} is declared more than once",
                    node.output()
                )));
            }
        }

        if !declared.contains(&self.output) {
            return Err(GlyphReelError::validation(format!(
                "output {} is never declared",
                self.output
            )));
        }
        if consumed.contains(&self.output) {
            return Err(GlyphReelError::validation(format!(
                "output {} is consumed inside the graph",
                self.output
            )));
        }
        if let Some(dangling) = declared
            .iter()
            .filter(|l| **l != &self.output && !consumed.contains(*l))
            .min()
        {
            return Err(GlyphReelError::validation(format!(
                "label {dangling} is declared but never consumed"
            )));
        }
        if used_inputs.len() != self.inputs.len() {
            return Err(GlyphReelError::validation(
                "every backend input must be scaled exactly once",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for OperationGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, node) in self.nodes.iter().enumerate() {
            if idx > 0 {
                f.write_str(";")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
