//! Deterministic network generators.
//!
//! Every generator is driven by a seed, so a scenario always produces the same
//! network and the same flow value.

use mf_core::{Capacity, MfResult, VertexIndex};
use serde::{Deserialize, Serialize};

/// Shape of a generated network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Topology {
    /// `layers` layers of `width` vertices; each vertex feeds a few vertices of the
    /// next layer. The source feeds the first layer, the last layer drains to the
    /// sink.
    Layered { layers: usize, width: usize },
    /// `rows × cols` grid with edges right, down and up. The source feeds the first
    /// column, the last column drains to the sink.
    Grid { rows: usize, cols: usize },
    /// Every ordered pair of `n` vertices, some with zero capacity. Loaded through
    /// the dense reader.
    Complete { n: usize },
}

/// Generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub topology: Topology,
    /// Capacities are drawn from `1..=max_capacity`.
    pub max_capacity: u32,
    pub seed: u64,
}

/// How a network is handed to the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputLayout {
    Dense,
    Sparse,
}

/// A generated flow network as a list of directed capacities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub vertex_count: usize,
    pub source: usize,
    pub sink: usize,
    pub layout: InputLayout,
    /// `(src, dst, capacity)`; no pair appears twice.
    pub arcs: Vec<(usize, usize, u64)>,
}

impl Network {
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Row-major `n × n` capacity matrix.
    pub fn dense<C: Capacity>(&self) -> MfResult<Vec<C>> {
        let n = self.vertex_count;
        let mut data = vec![C::ZERO; n * n];
        for &(src, dst, cap) in &self.arcs {
            data[src * n + dst] = C::from_u64(cap)?;
        }
        Ok(data)
    }

    /// Rows, columns and capacities in the requested widths.
    pub fn triplets<V: VertexIndex, C: Capacity>(&self) -> MfResult<(Vec<V>, Vec<V>, Vec<C>)> {
        let mut rows = Vec::with_capacity(self.arcs.len());
        let mut cols = Vec::with_capacity(self.arcs.len());
        let mut caps = Vec::with_capacity(self.arcs.len());
        for &(src, dst, cap) in &self.arcs {
            rows.push(V::from_usize(src)?);
            cols.push(V::from_usize(dst)?);
            caps.push(C::from_u64(cap)?);
        }
        Ok((rows, cols, caps))
    }

    /// Sum of the capacities leaving the source; an upper bound on the flow.
    pub fn source_capacity(&self) -> u64 {
        self.arcs
            .iter()
            .filter(|a| a.0 == self.source && a.1 != self.source)
            .map(|a| a.2)
            .sum()
    }
}

/// SplitMix64: small, fast and fully deterministic.
#[derive(Debug, Clone)]
struct SplitMix(u64);

impl SplitMix {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform-ish value in `0..bound`; `bound` must be non-zero.
    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }

    fn capacity(&mut self, max: u32) -> u64 {
        1 + self.below(u64::from(max.max(1)))
    }
}

impl NetworkSpec {
    pub fn generate(&self) -> Network {
        let mut rng = SplitMix(self.seed);
        match self.topology {
            Topology::Layered { layers, width } => {
                layered(layers.max(1), width.max(1), self.max_capacity, &mut rng)
            }
            Topology::Grid { rows, cols } => grid(rows.max(1), cols.max(1), self.max_capacity, &mut rng),
            Topology::Complete { n } => complete(n.max(2), self.max_capacity, &mut rng),
        }
    }
}

fn layered(layers: usize, width: usize, max: u32, rng: &mut SplitMix) -> Network {
    let n = layers * width + 2;
    let (source, sink) = (0, n - 1);
    let at = |layer: usize, i: usize| 1 + layer * width + i;
    let fan_out = width.min(3);

    let mut arcs = Vec::new();
    for i in 0..width {
        arcs.push((source, at(0, i), rng.capacity(max)));
        arcs.push((at(layers - 1, i), sink, rng.capacity(max)));
    }
    for layer in 0..layers - 1 {
        for i in 0..width {
            // Distinct targets: a random start, then consecutive offsets.
            let start = rng.below(width as u64) as usize;
            for k in 0..fan_out {
                let j = (start + k) % width;
                arcs.push((at(layer, i), at(layer + 1, j), rng.capacity(max)));
            }
        }
    }
    Network {
        vertex_count: n,
        source,
        sink,
        layout: InputLayout::Sparse,
        arcs,
    }
}

fn grid(rows: usize, cols: usize, max: u32, rng: &mut SplitMix) -> Network {
    let n = rows * cols + 2;
    let (source, sink) = (0, n - 1);
    let at = |r: usize, c: usize| 1 + r * cols + c;

    let mut arcs = Vec::new();
    for r in 0..rows {
        arcs.push((source, at(r, 0), rng.capacity(max)));
        arcs.push((at(r, cols - 1), sink, rng.capacity(max)));
        for c in 0..cols {
            if c + 1 < cols {
                arcs.push((at(r, c), at(r, c + 1), rng.capacity(max)));
            }
            if r + 1 < rows {
                arcs.push((at(r, c), at(r + 1, c), rng.capacity(max)));
                arcs.push((at(r + 1, c), at(r, c), rng.capacity(max)));
            }
        }
    }
    Network {
        vertex_count: n,
        source,
        sink,
        layout: InputLayout::Sparse,
        arcs,
    }
}

fn complete(n: usize, max: u32, rng: &mut SplitMix) -> Network {
    let mut arcs = Vec::new();
    for src in 0..n {
        for dst in 0..n {
            // About a quarter of the pairs stay empty.
            if src != dst && rng.below(4) != 0 {
                arcs.push((src, dst, rng.capacity(max)));
            }
        }
    }
    Network {
        vertex_count: n,
        source: 0,
        sink: n - 1,
        layout: InputLayout::Dense,
        arcs,
    }
}
