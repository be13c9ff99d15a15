//! Graph registry: long-lived graphs addressed by opaque handles.
//!
//! Graphs of any precision and edge kind share one table. Each entry is stored
//! type-erased behind an `Arc` together with the [`GraphKind`] needed to recover
//! its concrete type. Handles come from a counter that only moves forward, so a
//! destroyed handle is never handed out again.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mf_graph::{ResidualEdge, ResidualGraph};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::catalog::{EdgeKind, PrecisionMode};
use crate::error::{AppError, AppResult};

/// Opaque identifier of a registered graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphHandle(u64);

impl GraphHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GraphHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Concrete instantiation of a stored graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphKind {
    pub precision: PrecisionMode,
    pub edges: EdgeKind,
}

impl GraphKind {
    pub fn of<E: ResidualEdge>() -> Self {
        Self {
            precision: PrecisionMode::of::<E::Vertex, E::Cap>(),
            edges: if E::CACHES_REVERSE {
                EdgeKind::Cached
            } else {
                EdgeKind::Basic
            },
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with {} edges", self.precision, self.edges)
    }
}

/// A residual graph of any instantiation, shared by reference count.
///
/// Cloning is cheap and never copies edges.
#[derive(Clone)]
pub struct StoredGraph {
    kind: GraphKind,
    vertex_count: usize,
    edge_count: usize,
    graph: Arc<dyn Any + Send + Sync>,
}

impl StoredGraph {
    pub fn new<E: ResidualEdge>(graph: ResidualGraph<E>) -> Self {
        Self {
            kind: GraphKind::of::<E>(),
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
            graph: Arc::new(graph),
        }
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Borrow the graph as `ResidualGraph<E>`; fails if `E` is not the stored type.
    pub fn downcast<E: ResidualEdge>(&self) -> AppResult<&ResidualGraph<E>> {
        self.graph
            .downcast_ref::<ResidualGraph<E>>()
            .ok_or_else(|| {
                AppError::invalid(format!(
                    "graph holds {}, not {}",
                    self.kind,
                    GraphKind::of::<E>()
                ))
            })
    }
}

impl fmt::Debug for StoredGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredGraph")
            .field("kind", &self.kind)
            .field("vertex_count", &self.vertex_count)
            .field("edge_count", &self.edge_count)
            .finish()
    }
}

/// Handle table for persisted graphs.
///
/// Mutating operations take `&mut self`; wrap the registry in
/// [`SharedRegistry`] to share it between threads.
#[derive(Debug, Default)]
pub struct GraphRegistry {
    next_handle: u64,
    entries: BTreeMap<GraphHandle, StoredGraph>,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `graph` under a fresh handle.
    #[instrument(level = "debug", skip(self, graph), fields(kind = %graph.kind()))]
    pub fn insert(&mut self, graph: StoredGraph) -> GraphHandle {
        let handle = GraphHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.insert(handle, graph);
        debug!(%handle, live = self.entries.len(), "graph registered");
        handle
    }

    /// The graph behind `handle`.
    pub fn get(&self, handle: GraphHandle) -> AppResult<StoredGraph> {
        self.entries
            .get(&handle)
            .cloned()
            .ok_or(AppError::InvalidHandle(handle))
    }

    pub fn contains(&self, handle: GraphHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Remove `handle`. Returns whether it was registered.
    ///
    /// Clones obtained earlier through [`get`](Self::get) stay valid.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy(&mut self, handle: GraphHandle) -> bool {
        let removed = self.entries.remove(&handle).is_some();
        debug!(removed, live = self.entries.len(), "graph destroyed");
        removed
    }

    /// Live handles in allocation order.
    pub fn handles(&self) -> Vec<GraphHandle> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mutex-guarded registry that can be cloned across threads and sessions.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<GraphRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the registry, recovering from poisoning.
    pub fn lock(&self) -> MutexGuard<'_, GraphRegistry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, graph: StoredGraph) -> GraphHandle {
        self.lock().insert(graph)
    }

    pub fn get(&self, handle: GraphHandle) -> AppResult<StoredGraph> {
        self.lock().get(handle)
    }

    pub fn destroy(&self, handle: GraphHandle) -> bool {
        self.lock().destroy(handle)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl From<GraphRegistry> for SharedRegistry {
    fn from(registry: GraphRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }
}
