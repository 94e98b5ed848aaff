use std::fmt;

use xxhash_rust::xxh3::Xxh3;

use crate::graph::model::OperationGraph;
use crate::text::tokens::GlyphCase;

const XXH3_SEED: u64 = 0x6c79_7068_7265_656c;

/// Stable 128-bit fingerprint of an [`OperationGraph`].
///
/// Equal graphs always hash equal across runs and platforms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl fmt::Display for GraphFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

pub(crate) fn fingerprint_graph(graph: &OperationGraph) -> GraphFingerprint {
    let mut h = StableHasher::new();

    h.write_u32(graph.inputs.len() as u32);
    for key in &graph.inputs {
        h.write_u8(match key.case {
            GlyphCase::Upper => b'U',
            GlyphCase::Lower => b'L',
        });
        h.write_u32(u32::from(key.ch));
    }

    // The filter description already encodes every node field.
    h.write_u32(graph.nodes.len() as u32);
    h.write_str(&graph.to_filter_complex());
    h.write_str(graph.output.as_str());
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> GraphFingerprint {
        let v = self.inner.digest128();
        GraphFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}
