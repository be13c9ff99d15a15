//! Algorithm identifiers, precision modes and edge kinds.

use std::fmt;

use mf_core::{Capacity, VertexIndex};
use serde::{Deserialize, Serialize};

/// One of the eight supported max-flow algorithm families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmId {
    EdmondsKarp,
    Dinic,
    PushRelabelFifo,
    PushRelabelHighestLabel,
    AhujaOrlin,
    ParallelPushRelabel,
    PushRelabelSegmented,
    AhujaOrlinSegmented,
}

impl AlgorithmId {
    pub const ALL: [AlgorithmId; 8] = [
        AlgorithmId::EdmondsKarp,
        AlgorithmId::Dinic,
        AlgorithmId::PushRelabelFifo,
        AlgorithmId::PushRelabelHighestLabel,
        AlgorithmId::AhujaOrlin,
        AlgorithmId::ParallelPushRelabel,
        AlgorithmId::PushRelabelSegmented,
        AlgorithmId::AhujaOrlinSegmented,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmId::EdmondsKarp => "edmonds-karp",
            AlgorithmId::Dinic => "dinic",
            AlgorithmId::PushRelabelFifo => "push-relabel-fifo",
            AlgorithmId::PushRelabelHighestLabel => "push-relabel-highest-label",
            AlgorithmId::AhujaOrlin => "ahuja-orlin",
            AlgorithmId::ParallelPushRelabel => "parallel-push-relabel",
            AlgorithmId::PushRelabelSegmented => "push-relabel-segmented",
            AlgorithmId::AhujaOrlinSegmented => "ahuja-orlin-segmented",
        }
    }

    /// Whether the thread count passed to a run has any effect.
    pub fn is_parallel(&self) -> bool {
        matches!(
            self,
            AlgorithmId::ParallelPushRelabel
                | AlgorithmId::PushRelabelSegmented
                | AlgorithmId::AhujaOrlinSegmented
        )
    }

    /// Label-based algorithms run on edges with a reverse-capacity cache.
    pub fn uses_cached_edges(&self) -> bool {
        !matches!(self, AlgorithmId::EdmondsKarp | AlgorithmId::Dinic)
    }

    pub fn edge_kind(&self) -> EdgeKind {
        if self.uses_cached_edges() {
            EdgeKind::Cached
        } else {
            EdgeKind::Basic
        }
    }
}

/// Every algorithm identifier, in catalogue order.
pub fn algorithm_names() -> Vec<&'static str> {
    AlgorithmId::ALL.iter().map(AlgorithmId::name).collect()
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for AlgorithmId {
    type Err = &'static str;

    /// Accepts the catalogue names, case-insensitively, with `_` or `-` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "edmonds-karp" => Ok(AlgorithmId::EdmondsKarp),
            "dinic" => Ok(AlgorithmId::Dinic),
            "push-relabel-fifo" => Ok(AlgorithmId::PushRelabelFifo),
            "push-relabel-highest-label" | "push-relabel-highest" => {
                Ok(AlgorithmId::PushRelabelHighestLabel)
            }
            "ahuja-orlin" => Ok(AlgorithmId::AhujaOrlin),
            "parallel-push-relabel" => Ok(AlgorithmId::ParallelPushRelabel),
            "push-relabel-segmented" | "parallel-push-relabel-segment" => {
                Ok(AlgorithmId::PushRelabelSegmented)
            }
            "ahuja-orlin-segmented" | "parallel-ahujaorlin-segment" => {
                Ok(AlgorithmId::AhujaOrlinSegmented)
            }
            _ => Err("unknown algorithm"),
        }
    }
}

/// Vertex-index and capacity widths of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrecisionMode {
    #[serde(rename = "u32-u32")]
    U32U32,
    #[default]
    #[serde(rename = "u32-u64")]
    U32U64,
    #[serde(rename = "u64-u32")]
    U64U32,
    #[serde(rename = "u64-u64")]
    U64U64,
}

impl PrecisionMode {
    pub const ALL: [PrecisionMode; 4] = [
        PrecisionMode::U32U32,
        PrecisionMode::U32U64,
        PrecisionMode::U64U32,
        PrecisionMode::U64U64,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PrecisionMode::U32U32 => "u32-u32",
            PrecisionMode::U32U64 => "u32-u64",
            PrecisionMode::U64U32 => "u64-u32",
            PrecisionMode::U64U64 => "u64-u64",
        }
    }

    /// Mode number 1-4, in (index width, capacity width) order.
    pub fn code(&self) -> u8 {
        match self {
            PrecisionMode::U32U32 => 1,
            PrecisionMode::U32U64 => 2,
            PrecisionMode::U64U32 => 3,
            PrecisionMode::U64U64 => 4,
        }
    }

    pub fn from_bits(index_bits: u32, capacity_bits: u32) -> Option<Self> {
        match (index_bits, capacity_bits) {
            (32, 32) => Some(PrecisionMode::U32U32),
            (32, 64) => Some(PrecisionMode::U32U64),
            (64, 32) => Some(PrecisionMode::U64U32),
            (64, 64) => Some(PrecisionMode::U64U64),
            _ => None,
        }
    }

    /// The mode matching a `(VertexIndex, Capacity)` type pair.
    pub fn of<V: VertexIndex, C: Capacity>() -> Self {
        match (V::BITS, C::BITS) {
            (32, 32) => PrecisionMode::U32U32,
            (32, _) => PrecisionMode::U32U64,
            (_, 32) => PrecisionMode::U64U32,
            _ => PrecisionMode::U64U64,
        }
    }

    /// Narrowest index width that can name `n` vertices, paired with the
    /// caller's capacity width.
    pub fn for_network(n: usize, wide_capacities: bool) -> Self {
        let narrow_index = u32::try_from(n).is_ok();
        match (narrow_index, wide_capacities) {
            (true, false) => PrecisionMode::U32U32,
            (true, true) => PrecisionMode::U32U64,
            (false, false) => PrecisionMode::U64U32,
            (false, true) => PrecisionMode::U64U64,
        }
    }

    pub fn index_bits(&self) -> u32 {
        match self {
            PrecisionMode::U32U32 | PrecisionMode::U32U64 => 32,
            PrecisionMode::U64U32 | PrecisionMode::U64U64 => 64,
        }
    }

    pub fn capacity_bits(&self) -> u32 {
        match self {
            PrecisionMode::U32U32 | PrecisionMode::U64U32 => 32,
            PrecisionMode::U32U64 | PrecisionMode::U64U64 => 64,
        }
    }
}

impl fmt::Display for PrecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PrecisionMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "u32-u32" | "32-32" | "1" => Ok(PrecisionMode::U32U32),
            "u32-u64" | "32-64" | "2" => Ok(PrecisionMode::U32U64),
            "u64-u32" | "64-32" | "3" => Ok(PrecisionMode::U64U32),
            "u64-u64" | "64-64" | "4" => Ok(PrecisionMode::U64U64),
            _ => Err("unknown precision mode"),
        }
    }
}

/// Edge record layout a graph was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    #[default]
    Basic,
    Cached,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Basic => write!(f, "basic"),
            EdgeKind::Cached => write!(f, "cached"),
        }
    }
}
